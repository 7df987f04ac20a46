pub mod mermaid;

pub use mermaid::MermaidFormatter;

use std::path::{Path, PathBuf};

use crate::core::graph::GraphMode;

/// Directory, relative to the scanned root, that receives every rendered graph.
pub const GRAPHS_DIR: &str = "docs/architecture/graphs";

pub const FILE_GRAPH_NAME: &str = "code_graph.mmd";
pub const CLASS_GRAPH_NAME: &str = "class_graph.mmd";
pub const CALL_GRAPH_NAME: &str = "call_graph.mmd";
pub const FOCUS_GRAPH_NAME: &str = "focus_graph.mmd";

/// Conventional output path for a mode; any focused run shares one file.
pub fn output_path(root: &Path, mode: GraphMode, focused: bool) -> PathBuf {
    let file_name = if focused {
        FOCUS_GRAPH_NAME
    } else {
        match mode {
            GraphMode::File => FILE_GRAPH_NAME,
            GraphMode::Class => CLASS_GRAPH_NAME,
            GraphMode::Call => CALL_GRAPH_NAME,
        }
    };
    root.join(GRAPHS_DIR).join(file_name)
}
