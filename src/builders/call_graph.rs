use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use super::ParsedProject;
use crate::core::graph::{
    CodeGraph, Edge, EdgeType, GraphBuilder, GraphMode, IdAllocator, Node, NodeType,
};
use crate::core::resolver::SymbolResolver;

/// Id of the single node rendered when the entry symbol is unknown.
pub const NOT_FOUND_ID: &str = "not_found";

#[derive(Debug, Clone)]
struct RegisteredCallable {
    unit_name: String,
    callees: Vec<String>,
}

/// Every top-level function and top-level class method, keyed by qualified name.
///
/// A name defined in several units keeps its first registration position but
/// the last definition's callees.
#[derive(Debug, Clone, Default)]
pub struct CallRegistry {
    order: Vec<String>,
    callables: HashMap<String, RegisteredCallable>,
    names: BTreeSet<String>,
}

impl CallRegistry {
    pub fn collect(project: &ParsedProject) -> Self {
        let mut registry = Self::default();
        for (_, unit, facts) in project.parsed() {
            let unit_name = unit.stem();
            for callable in &facts.callables {
                registry.register(
                    &callable.qualified_name,
                    unit_name.clone(),
                    callable.callees.clone(),
                );
            }
        }
        registry
    }

    pub fn register(&mut self, qualified_name: &str, unit_name: String, callees: Vec<String>) {
        if self.names.insert(qualified_name.to_string()) {
            self.order.push(qualified_name.to_string());
        }
        self.callables.insert(
            qualified_name.to_string(),
            RegisteredCallable { unit_name, callees },
        );
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.names.contains(qualified_name)
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Qualified names in registration order.
    pub fn ordered(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn callees(&self, qualified_name: &str) -> &[String] {
        self.callables
            .get(qualified_name)
            .map(|callable| callable.callees.as_slice())
            .unwrap_or(&[])
    }

    pub fn unit_name(&self, qualified_name: &str) -> Option<&str> {
        self.callables
            .get(qualified_name)
            .map(|callable| callable.unit_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Result of an entry-point traversal.
#[derive(Debug, Clone)]
pub struct EntryTrace {
    pub graph: CodeGraph,
    /// Qualified name the traversal started from, `None` when the entry was not found.
    pub start: Option<String>,
}

/// Function/method call graph.
pub struct CallGraphBuilder {
    resolver: SymbolResolver,
    entry_resolver: SymbolResolver,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        Self::with_resolvers(SymbolResolver::for_calls(), SymbolResolver::for_entry_points())
    }

    pub fn with_resolvers(resolver: SymbolResolver, entry_resolver: SymbolResolver) -> Self {
        Self {
            resolver,
            entry_resolver,
        }
    }

    fn resolve<'a>(&self, callee: &'a str, registry: &'a CallRegistry) -> (&'a str, bool) {
        match self.resolver.resolve(callee, registry.names()) {
            Some(resolved) => (resolved, true),
            None => (callee, false),
        }
    }

    /// Whole-project call graph.
    ///
    /// With `focus`, only callables from units whose name contains it are used
    /// as callers; their callees are kept whether or not they resolve. Without
    /// it, every registered callable appears, called or not.
    pub fn build_full(&self, registry: &CallRegistry, focus: Option<&str>) -> CodeGraph {
        let mut relevant: BTreeMap<String, NodeType> = BTreeMap::new();
        let mut calls: Vec<(String, String)> = Vec::new();

        for caller in registry.ordered() {
            if let Some(focus) = focus {
                let unit_name = registry.unit_name(caller).unwrap_or_default();
                if !unit_name.contains(focus) {
                    continue;
                }
            }

            relevant.insert(caller.to_string(), NodeType::Callable);
            for callee in registry.callees(caller) {
                let (target, resolved) = self.resolve(callee, registry);
                let node_type = if resolved {
                    NodeType::Callable
                } else {
                    NodeType::Unresolved
                };
                relevant.entry(target.to_string()).or_insert(node_type);
                calls.push((caller.to_string(), target.to_string()));
            }
        }

        if focus.is_none() {
            for name in registry.ordered() {
                relevant.insert(name.to_string(), NodeType::Callable);
            }
        }

        let mut ids = IdAllocator::new();
        let mut builder = GraphBuilder::new();
        for (name, node_type) in &relevant {
            builder.add_node(Node::new(ids.id_for(name), name.clone(), *node_type));
        }
        for (caller, callee) in &calls {
            builder.add_edge(Edge::new(
                EdgeType::Calls,
                ids.id_for(caller),
                ids.id_for(callee),
            ));
        }

        log::info!(
            "Call graph: {} callables registered, {} call edges",
            registry.len(),
            calls.len()
        );
        CodeGraph::new(GraphMode::Call, builder.build())
    }

    /// Breadth-first closure of everything reachable from `entry`.
    ///
    /// Unresolved callees become leaves and are never expanded. Each qualified
    /// name is enqueued at most once, so the traversal always terminates.
    pub fn build_from_entry(&self, registry: &CallRegistry, entry: &str) -> EntryTrace {
        let Some(start) = self.entry_resolver.resolve(entry, registry.names()) else {
            log::warn!("Entry '{}' not found among {} callables", entry, registry.len());
            let mut builder = GraphBuilder::new();
            builder.add_node(Node::new(
                NOT_FOUND_ID.to_string(),
                format!("{} not found", entry),
                NodeType::Diagnostic,
            ));
            return EntryTrace {
                graph: CodeGraph::new(GraphMode::Call, builder.build()),
                start: None,
            };
        };

        let mut ids = IdAllocator::new();
        let mut builder = GraphBuilder::new();
        let mut enqueued: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        builder.add_node(Node::new(ids.id_for(start), start.to_string(), NodeType::Callable));
        enqueued.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for callee in registry.callees(current) {
                let (target, resolved) = self.resolve(callee, registry);
                let target_id = ids.id_for(target);

                if resolved {
                    if enqueued.insert(target) {
                        builder.add_node(Node::new(
                            target_id.clone(),
                            target.to_string(),
                            NodeType::Callable,
                        ));
                        queue.push_back(target);
                    }
                } else {
                    builder.add_node(Node::new(
                        target_id.clone(),
                        target.to_string(),
                        NodeType::Unresolved,
                    ));
                }

                builder.add_edge(Edge::new(EdgeType::Calls, ids.id_for(current), target_id));
            }
        }

        EntryTrace {
            graph: CodeGraph::new(GraphMode::Call, builder.build()),
            start: Some(start.to_string()),
        }
    }
}

impl Default for CallGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
