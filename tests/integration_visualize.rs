use archgraph::core::{init_architecture, CodebaseAnalyzer, ReportStatus};
use archgraph::{visualize, GraphMode};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_project() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root, "src/zoo/__init__.py", "");
    write(
        root,
        "src/zoo/animals.py",
        "class Animal:\n    def speak(self):\n        ...\n\nclass Dog(Animal):\n    def speak(self):\n        return self.bark()\n\n    def bark(self):\n        ...\n",
    );
    write(
        root,
        "src/zoo/app.py",
        "from zoo.animals import Dog\n\ndef create_dog():\n    return Dog()\n\ndef process():\n    dog = create_dog()\n    dog.speak()\n\ndef run():\n    process()\n",
    );
    write(root, "src/zoo/broken.py", "def nope(:\n");
    write(root, "tests/test_app.py", "import zoo.app\n");
    dir
}

fn graphs_dir(root: &Path) -> PathBuf {
    fs::canonicalize(root).unwrap().join("docs/architecture/graphs")
}

/// Every node id appears once and every edge endpoint names a declared node.
fn assert_well_formed_flowchart(text: &str) {
    let mut declared = HashSet::new();
    for line in text.lines().skip(1) {
        let line = line.trim();
        if let Some((src, dst)) = line.split_once(" --> ") {
            assert!(declared.contains(src), "undeclared source {src}");
            assert!(declared.contains(dst), "undeclared target {dst}");
        } else if let Some((id, _)) = line.split_once("[\"") {
            assert!(declared.insert(id.to_string()), "duplicate id {id}");
        }
    }
}

#[test]
fn file_mode_writes_code_graph() {
    let dir = sample_project();
    let report = visualize(dir.path(), None, GraphMode::File, None).unwrap();

    let expected = graphs_dir(dir.path()).join("code_graph.mmd");
    assert_eq!(report.status, ReportStatus::Written);
    assert_eq!(report.output_path.as_deref(), Some(expected.as_path()));
    assert_eq!(report.to_string(), format!("✅ Graph: {}", expected.display()));
    assert_eq!(report.units_scanned, 4);
    assert_eq!(report.skipped.len(), 1);

    let text = fs::read_to_string(&expected).unwrap();
    assert!(text.starts_with("graph TD\n"));
    assert!(text.contains("    src_zoo_app_py --> src_zoo_animals_py"));
    assert!(text.contains("    click src_zoo_app_py href \"src/zoo/app.py\""));
    assert!(!text.contains("test_app"));
    assert_well_formed_flowchart(&text);
}

#[test]
fn class_and_call_modes_write_their_own_files() {
    let dir = sample_project();
    let graphs = graphs_dir(dir.path());

    let report = visualize(dir.path(), None, GraphMode::Class, None).unwrap();
    assert!(report.is_written());
    let class_text = fs::read_to_string(graphs.join("class_graph.mmd")).unwrap();
    assert!(class_text.contains("Animal <|-- Dog"));

    let report = visualize(dir.path(), None, GraphMode::Call, Some("run")).unwrap();
    assert!(report.is_written());
    assert_eq!(report.missing_entry, None);
    let call_text = fs::read_to_string(graphs.join("call_graph.mmd")).unwrap();
    assert!(call_text.contains("    run --> process"));
    assert!(call_text.contains("    process --> create_dog"));
    assert_well_formed_flowchart(&call_text);

    visualize(dir.path(), None, GraphMode::Call, None).unwrap();
    let full_text = fs::read_to_string(graphs.join("call_graph.mmd")).unwrap();
    assert!(full_text.contains("    Dog_speak --> Dog_bark"));
    assert_well_formed_flowchart(&full_text);
}

#[test]
fn focused_runs_share_the_focus_graph() {
    let dir = sample_project();
    let focus_path = graphs_dir(dir.path()).join("focus_graph.mmd");

    let report = visualize(dir.path(), Some("animals"), GraphMode::File, None).unwrap();
    assert_eq!(report.output_path.as_deref(), Some(focus_path.as_path()));
    let text = fs::read_to_string(&focus_path).unwrap();
    assert!(text.contains("src_zoo_animals_py"));
    assert!(text.contains("src_zoo_app_py"));
    assert!(!text.contains("src_zoo___init___py"));

    visualize(dir.path(), Some("animals"), GraphMode::Class, None).unwrap();
    let text = fs::read_to_string(&focus_path).unwrap();
    assert!(text.starts_with("classDiagram"));
}

#[test]
fn file_focus_without_match_reports_failure_and_writes_nothing() {
    let dir = sample_project();
    let report = visualize(dir.path(), Some("payments"), GraphMode::File, None).unwrap();

    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(
        report.to_string(),
        "❌ Focus target 'payments' not found. (Scanned 4 files)"
    );
    assert!(report.output_path.is_none());
    assert!(!graphs_dir(dir.path()).join("focus_graph.mmd").exists());
}

#[test]
fn unknown_entry_still_writes_a_diagnostic_graph() {
    let dir = sample_project();
    let report = visualize(dir.path(), None, GraphMode::Call, Some("launch")).unwrap();

    assert!(report.is_written());
    assert_eq!(report.missing_entry.as_deref(), Some("launch"));
    let text = fs::read_to_string(graphs_dir(dir.path()).join("call_graph.mmd")).unwrap();
    assert_eq!(text, "graph TD\n    not_found[\"launch not found\"]");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = sample_project();
    let analyzer = CodebaseAnalyzer::new().unwrap();

    for mode in [GraphMode::File, GraphMode::Class, GraphMode::Call] {
        let first = analyzer.visualize(dir.path(), None, mode, None).unwrap();
        let path = first.output_path.clone().unwrap();
        let before = fs::read(&path).unwrap();

        let second = analyzer.visualize(dir.path(), None, mode, None).unwrap();
        assert_eq!(second.output_path, first.output_path);
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}

#[test]
fn report_serializes_to_json() {
    let dir = sample_project();
    let report = visualize(dir.path(), None, GraphMode::Class, None).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["mode"], "class");
    assert_eq!(value["status"], "written");
    assert_eq!(value["skipped"][0]["reason"]["kind"], "syntax_error");
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(visualize(&dir.path().join("absent"), None, GraphMode::File, None).is_err());
}

#[test]
fn init_architecture_creates_placeholders_once() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    let status = init_architecture(root).unwrap();
    assert_eq!(status, "✅ Init: Structure Complete");

    let graphs = root.join("docs/architecture/graphs");
    assert!(root.join("docs/architecture/governance").is_dir());
    assert_eq!(
        fs::read_to_string(graphs.join("system_design.mmd")).unwrap(),
        "graph TD\n    User --> System"
    );
    assert_eq!(
        fs::read_to_string(graphs.join("code_graph.mmd")).unwrap(),
        "classDiagram\n    %% Empty"
    );

    fs::write(graphs.join("code_graph.mmd"), "graph TD\n    a --> b").unwrap();
    init_architecture(root).unwrap();
    assert_eq!(
        fs::read_to_string(graphs.join("code_graph.mmd")).unwrap(),
        "graph TD\n    a --> b"
    );
}
