use std::collections::HashSet;

use super::ParsedProject;
use crate::core::error::{GraphError, Result};
use crate::core::graph::{CodeGraph, Edge, EdgeType, GraphBuilder, GraphMode, Node, NodeType};
use crate::core::module_index::ModuleIndex;
use crate::core::resolver::SymbolResolver;

/// Import/dependency graph between source units.
pub struct FileGraphBuilder {
    resolver: SymbolResolver,
}

impl FileGraphBuilder {
    pub fn new() -> Self {
        Self::with_resolver(SymbolResolver::for_imports())
    }

    pub fn with_resolver(resolver: SymbolResolver) -> Self {
        Self { resolver }
    }

    /// Every unit becomes a node; each resolvable import adds one edge.
    ///
    /// With `focus`, only units whose relative path contains it, their direct
    /// neighbours and the connecting edges are kept. A focus that matches no
    /// unit is an error rather than an empty graph.
    pub fn build(
        &self,
        project: &ParsedProject,
        index: &ModuleIndex,
        focus: Option<&str>,
    ) -> Result<CodeGraph> {
        let mut builder = GraphBuilder::new();

        for unit in &project.units {
            builder.add_node(
                Node::new(unit.node_id.clone(), unit.file_name(), NodeType::File)
                    .with_file(unit.relative_path.clone()),
            );
        }

        for (position, unit, facts) in project.parsed() {
            for imported in &facts.imports {
                let Some(target) = index.resolve(imported, &self.resolver) else {
                    continue;
                };
                if target == position {
                    continue;
                }
                let target_id = project.units[target].node_id.clone();
                builder.add_edge(Edge::new(
                    EdgeType::Imports,
                    unit.node_id.clone(),
                    target_id,
                ));
            }
        }

        let graph = CodeGraph::new(GraphMode::File, builder.build());

        let Some(focus) = focus else {
            return Ok(graph);
        };

        let seeds: HashSet<String> = project
            .units
            .iter()
            .filter(|unit| unit.relative_display().contains(focus))
            .map(|unit| unit.node_id.clone())
            .collect();

        if seeds.is_empty() {
            return Err(GraphError::FocusNotFound {
                focus: focus.to_string(),
                scanned: project.len(),
            });
        }

        Ok(graph.focus_neighborhood(&seeds))
    }
}

impl Default for FileGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
