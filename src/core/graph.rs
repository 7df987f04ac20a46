use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
    Directed, Graph,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::GraphError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    File,
    Class,
    Call,
}

impl GraphMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphMode::File => "file",
            GraphMode::Class => "class",
            GraphMode::Call => "call",
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "file" => Ok(GraphMode::File),
            "class" => Ok(GraphMode::Class),
            "call" => Ok(GraphMode::Call),
            other => Err(GraphError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeType {
    File,
    Class,
    /// Base class that was referenced but never defined in the scanned units.
    ExternalClass,
    Callable,
    /// Callee that matched no registered definition.
    Unresolved,
    Diagnostic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EdgeType {
    Imports,
    /// Derived -> Base.
    Inherits,
    Calls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub file_path: Option<PathBuf>,
    /// Method signatures for class nodes.
    pub members: Vec<String>,
    pub bases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub edge_type: EdgeType,
    pub source_id: String,
    pub target_id: String,
}

pub type DependencyGraph = Graph<Node, Edge, Directed>;

impl Node {
    pub fn new(id: String, name: String, node_type: NodeType) -> Self {
        Self {
            id,
            name,
            node_type,
            file_path: None,
            members: Vec::new(),
            bases: Vec::new(),
        }
    }

    pub fn with_file(mut self, file_path: PathBuf) -> Self {
        self.file_path = Some(file_path);
        self
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }
}

impl Edge {
    pub fn new(edge_type: EdgeType, source_id: String, target_id: String) -> Self {
        Self {
            edge_type,
            source_id,
            target_id,
        }
    }
}

/// A built graph tagged with the mode that produced it.
#[derive(Debug, Clone)]
pub struct CodeGraph {
    pub mode: GraphMode,
    pub graph: DependencyGraph,
}

impl CodeGraph {
    pub fn new(mode: GraphMode, graph: DependencyGraph) -> Self {
        Self { mode, graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes().find(|node| node.id == id)
    }

    pub fn has_edge(&self, source_id: &str, target_id: &str) -> bool {
        self.edges()
            .any(|edge| edge.source_id == source_id && edge.target_id == target_id)
    }

    /// Keep the seed nodes, every node sharing an edge with a seed, and those edges.
    pub fn focus_neighborhood(&self, seeds: &HashSet<String>) -> CodeGraph {
        let mut keep: HashSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| seeds.contains(&self.graph[*idx].id))
            .collect();

        for edge in self.graph.edge_references() {
            let weight = edge.weight();
            if seeds.contains(&weight.source_id) || seeds.contains(&weight.target_id) {
                keep.insert(edge.source());
                keep.insert(edge.target());
            }
        }

        let graph = self.graph.filter_map(
            |idx, node| keep.contains(&idx).then(|| node.clone()),
            |_, edge| {
                (seeds.contains(&edge.source_id) || seeds.contains(&edge.target_id))
                    .then(|| edge.clone())
            },
        );

        CodeGraph::new(self.mode, graph)
    }
}

pub struct GraphBuilder {
    graph: DependencyGraph,
    node_map: HashMap<String, NodeIndex>,
    edge_set: HashSet<(EdgeType, String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_map: HashMap::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Add a node; an id that is already present keeps its first node.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(index) = self.node_map.get(&node.id) {
            return *index;
        }
        let id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        index
    }

    /// Add an edge between two present nodes. Returns `None` for a missing
    /// endpoint or an edge that was already added.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        let source_idx = *self.node_map.get(&edge.source_id)?;
        let target_idx = *self.node_map.get(&edge.target_id)?;
        let key = (edge.edge_type, edge.source_id.clone(), edge.target_id.clone());
        if !self.edge_set.insert(key) {
            return None;
        }
        Some(self.graph.add_edge(source_idx, target_idx, edge))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out graph-safe identifiers, stable per key and unique across keys.
#[derive(Debug, Default)]
pub struct IdAllocator {
    by_key: HashMap<String, String>,
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_for(&mut self, key: &str) -> String {
        if let Some(id) = self.by_key.get(key) {
            return id.clone();
        }

        let base = sanitize_id(key);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.used.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}_{}", base, suffix);
        }

        self.used.insert(candidate.clone());
        self.by_key.insert(key.to_string(), candidate.clone());
        candidate
    }
}

/// Replace every character that is not ASCII alphanumeric or `_` with `_`.
pub fn sanitize_id(raw: &str) -> String {
    let mut id: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if id.is_empty() {
        id.push('_');
    }
    // `end` closes a subgraph in flowchart markup
    if id == "end" {
        id.push('_');
    }
    id
}
