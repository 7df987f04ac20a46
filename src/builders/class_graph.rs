use std::collections::HashSet;

use super::ParsedProject;
use crate::core::graph::{CodeGraph, Edge, EdgeType, GraphBuilder, GraphMode, Node, NodeType};
use crate::parsers::ClassFacts;

/// Class structure and inheritance graph.
pub struct ClassGraphBuilder;

impl ClassGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Classes are keyed by bare name: when two units define the same name the
    /// first one in scan order wins and the other is dropped with its bases.
    /// Bases that are never defined become external nodes.
    pub fn build(&self, project: &ParsedProject, focus: Option<&str>) -> CodeGraph {
        let candidates: Vec<(String, &ClassFacts)> = project
            .parsed()
            .filter(|(_, unit, _)| focus.map_or(true, |f| unit.relative_display().contains(f)))
            .flat_map(|(_, unit, facts)| {
                let relative = unit.relative_display();
                facts
                    .classes
                    .iter()
                    .map(move |class| (relative.clone(), class))
            })
            .collect();

        let mut builder = GraphBuilder::new();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for (relative, class) in candidates {
            if !seen.insert(class.name.clone()) {
                log::debug!(
                    "Class {} in {} shadowed by an earlier definition",
                    class.name,
                    relative
                );
                continue;
            }

            builder.add_node(
                Node::new(class.name.clone(), class.name.clone(), NodeType::Class)
                    .with_file(relative.into())
                    .with_members(class.methods.clone())
                    .with_bases(class.bases.clone()),
            );
            kept.push(class);
        }

        for class in kept {
            for base in &class.bases {
                if !builder.contains(base) {
                    builder.add_node(Node::new(
                        base.clone(),
                        base.clone(),
                        NodeType::ExternalClass,
                    ));
                }
                builder.add_edge(Edge::new(
                    EdgeType::Inherits,
                    class.name.clone(),
                    base.clone(),
                ));
            }
        }

        CodeGraph::new(GraphMode::Class, builder.build())
    }
}

impl Default for ClassGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
