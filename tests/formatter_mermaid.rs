use archgraph::core::graph::{CodeGraph, Edge, EdgeType, GraphBuilder, GraphMode, Node, NodeType};
use archgraph::formatters::{output_path, MermaidFormatter};
use std::path::{Path, PathBuf};

#[test]
fn flowchart_lists_nodes_links_then_edges() {
    let mut gb = GraphBuilder::new();
    gb.add_node(
        Node::new("a_py".into(), "a.py".into(), NodeType::File).with_file(PathBuf::from("a.py")),
    );
    gb.add_node(
        Node::new("pkg_b_py".into(), "b.py".into(), NodeType::File)
            .with_file(PathBuf::from("pkg/b.py")),
    );
    gb.add_edge(Edge::new(EdgeType::Imports, "a_py".into(), "pkg_b_py".into()));
    let graph = CodeGraph::new(GraphMode::File, gb.build());

    let text = MermaidFormatter::new().format_graph(&graph);
    let expected = [
        "graph TD",
        "    a_py[\"a.py\"]",
        "    click a_py href \"a.py\"",
        "    pkg_b_py[\"b.py\"]",
        "    click pkg_b_py href \"pkg/b.py\"",
        "    a_py --> pkg_b_py",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn call_flowchart_escapes_quotes_in_labels() {
    let mut gb = GraphBuilder::new();
    gb.add_node(Node::new(
        "not_found".into(),
        "say\"hi not found".into(),
        NodeType::Diagnostic,
    ));
    let graph = CodeGraph::new(GraphMode::Call, gb.build());

    let text = MermaidFormatter::new().format_graph(&graph);
    assert_eq!(text, "graph TD\n    not_found[\"say#quot;hi not found\"]");
}

#[test]
fn class_diagram_renders_blocks_and_inheritance_per_class() {
    let mut gb = GraphBuilder::new();
    gb.add_node(
        Node::new("Animal".into(), "Animal".into(), NodeType::Class)
            .with_members(vec!["+speak()".into()]),
    );
    gb.add_node(
        Node::new("Dog".into(), "Dog".into(), NodeType::Class)
            .with_members(vec!["+speak()".into(), "-_wag(times)".into()])
            .with_bases(vec!["Animal".into(), "Pet".into()]),
    );
    gb.add_node(Node::new("Pet".into(), "Pet".into(), NodeType::ExternalClass));
    gb.add_edge(Edge::new(EdgeType::Inherits, "Dog".into(), "Animal".into()));
    gb.add_edge(Edge::new(EdgeType::Inherits, "Dog".into(), "Pet".into()));
    let graph = CodeGraph::new(GraphMode::Class, gb.build());

    let text = MermaidFormatter::new().format_graph(&graph);
    let expected = [
        "classDiagram",
        "    class Animal {",
        "        +speak()",
        "    }",
        "    class Dog {",
        "        +speak()",
        "        -_wag(times)",
        "    }",
        "    Animal <|-- Dog",
        "    Pet <|-- Dog",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn format_to_file_creates_directories_and_overwrites() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("deep/nested/graph.mmd");

    let mut gb = GraphBuilder::new();
    gb.add_node(Node::new("x".into(), "x".into(), NodeType::Callable));
    let graph = CodeGraph::new(GraphMode::Call, gb.build());

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "stale content that is much longer than the graph").unwrap();

    MermaidFormatter::new().format_to_file(&graph, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "graph TD\n    x[\"x\"]");
}

#[test]
fn output_paths_follow_the_naming_convention() {
    let root = Path::new("/project");
    let graphs = root.join("docs/architecture/graphs");

    assert_eq!(output_path(root, GraphMode::File, false), graphs.join("code_graph.mmd"));
    assert_eq!(output_path(root, GraphMode::Class, false), graphs.join("class_graph.mmd"));
    assert_eq!(output_path(root, GraphMode::Call, false), graphs.join("call_graph.mmd"));
    for mode in [GraphMode::File, GraphMode::Class, GraphMode::Call] {
        assert_eq!(output_path(root, mode, true), graphs.join("focus_graph.mmd"));
    }
}
