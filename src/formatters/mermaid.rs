use petgraph::visit::EdgeRef;
use std::fs;
use std::path::Path;

use crate::core::error::{GraphError, Result};
use crate::core::graph::{CodeGraph, EdgeType, GraphMode, NodeType};

const INDENT: &str = "    ";

/// Renders graphs as Mermaid markup: `graph TD` flowcharts for file and call
/// modes, `classDiagram` for class mode.
pub struct MermaidFormatter;

impl MermaidFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Write the rendered graph, creating parent directories and replacing any
    /// existing file.
    pub fn format_to_file(&self, graph: &CodeGraph, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|err| GraphError::io(parent, err))?;
        }
        let content = self.format_graph(graph);
        fs::write(output_path, content).map_err(|err| GraphError::io(output_path, err))?;
        Ok(())
    }

    pub fn format_graph(&self, graph: &CodeGraph) -> String {
        let lines = match graph.mode {
            GraphMode::File | GraphMode::Call => self.format_flowchart(graph),
            GraphMode::Class => self.format_class_diagram(graph),
        };
        lines.join("\n")
    }

    fn format_flowchart(&self, graph: &CodeGraph) -> Vec<String> {
        let mut lines = vec!["graph TD".to_string()];

        for node in graph.nodes() {
            lines.push(format!("{}{}[\"{}\"]", INDENT, node.id, escape_label(&node.name)));
            if node.node_type == NodeType::File {
                if let Some(path) = &node.file_path {
                    let href = path
                        .components()
                        .map(|part| part.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    lines.push(format!(
                        "{}click {} href \"{}\"",
                        INDENT,
                        node.id,
                        escape_label(&href)
                    ));
                }
            }
        }

        for edge in graph.edges() {
            lines.push(format!("{}{} --> {}", INDENT, edge.source_id, edge.target_id));
        }

        lines
    }

    fn format_class_diagram(&self, graph: &CodeGraph) -> Vec<String> {
        let mut lines = vec!["classDiagram".to_string()];
        let inner = &graph.graph;

        for idx in inner.node_indices() {
            let node = &inner[idx];
            if node.node_type != NodeType::Class {
                continue;
            }

            lines.push(format!("{}class {} {{", INDENT, node.id));
            for member in &node.members {
                lines.push(format!("{}{}{}", INDENT, INDENT, member));
            }
            lines.push(format!("{}}}", INDENT));

            // petgraph walks outgoing edges newest-first
            let mut parents: Vec<_> = inner
                .edges(idx)
                .filter(|edge| edge.weight().edge_type == EdgeType::Inherits)
                .collect();
            parents.sort_by_key(|edge| edge.id());
            for edge in parents {
                let weight = edge.weight();
                lines.push(format!(
                    "{}{} <|-- {}",
                    INDENT, weight.target_id, weight.source_id
                ));
            }
        }

        lines
    }
}

impl Default for MermaidFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
}
