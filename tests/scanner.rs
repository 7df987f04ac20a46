use archgraph::core::scanner::{logical_names_for, FileScanner};
use std::fs;
use std::path::Path;

fn touch<P: AsRef<Path>>(root: &Path, rel: P) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "# test\n").unwrap();
}

#[test]
fn scanner_skips_excluded_dirs_and_non_python_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root, "main.py");
    touch(root, "my-tool.py");
    touch(root, "notes.txt");
    touch(root, "src/app/__init__.py");
    touch(root, "src/app/core.py");
    touch(root, "tests/test_core.py");
    touch(root, "docs/conf.py");
    touch(root, ".venv/lib.py");
    touch(root, "pkg/__pycache__/cached.py");
    touch(root, "pkg/build/generated.py");

    let units = FileScanner::new().scan_directory(root).unwrap();
    let rels: Vec<String> = units.iter().map(|u| u.relative_display()).collect();

    assert_eq!(
        rels,
        vec![
            "main.py",
            "my-tool.py",
            "src/app/__init__.py",
            "src/app/core.py"
        ]
    );
}

#[test]
fn scanner_derives_ids_and_logical_names() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root, "my-tool.py");
    touch(root, "src/app/__init__.py");
    touch(root, "src/app/core.py");

    let units = FileScanner::new().scan_directory(root).unwrap();
    assert_eq!(units.len(), 3);

    assert_eq!(units[0].node_id, "my_tool_py");
    assert_eq!(units[0].logical_names, vec!["my-tool"]);
    assert_eq!(units[0].file_name(), "my-tool.py");
    assert_eq!(units[0].stem(), "my-tool");

    assert_eq!(units[1].node_id, "src_app___init___py");
    assert_eq!(
        units[1].logical_names,
        vec!["src.app.__init__", "app.__init__", "src.app", "app"]
    );

    assert_eq!(units[2].node_id, "src_app_core_py");
    assert_eq!(units[2].logical_names, vec!["src.app.core", "app.core"]);
    assert_eq!(units[2].module_name(), "src.app.core");
}

#[test]
fn colliding_ids_get_numeric_suffixes() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();

    touch(root, "a-b.py");
    touch(root, "a_b.py");

    let units = FileScanner::new().scan_directory(root).unwrap();
    let ids: Vec<&str> = units.iter().map(|u| u.node_id.as_str()).collect();
    assert_eq!(ids, vec!["a_b_py", "a_b_py_2"]);
}

#[test]
fn logical_names_for_package_index_outside_src() {
    assert_eq!(
        logical_names_for(Path::new("pkg/__init__.py")),
        vec!["pkg.__init__", "pkg"]
    );
    assert_eq!(logical_names_for(Path::new("pkg/mod.py")), vec!["pkg.mod"]);
    assert_eq!(logical_names_for(Path::new("src/x.py")), vec!["src.x", "x"]);
    assert_eq!(logical_names_for(Path::new("__init__.py")), vec!["__init__"]);
}

#[test]
fn scanning_a_missing_root_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(FileScanner::new().scan_directory(&missing).is_err());
}
