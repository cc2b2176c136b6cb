//! Static dependency analysis of a sheet.
//!
//! Builds the full dependency graph up front, which the lazy resolver never
//! does, to report every missing reference and cycle at once together with an
//! evaluation order.

use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::document::SheetDocument;

/// A formula argument that names no key in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MissingReference {
    /// Formula holding the reference.
    pub formula: String,
    /// The absent key.
    pub missing: String,
}

/// Result of analyzing a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// References to absent keys, sorted by formula then key.
    pub missing: Vec<MissingReference>,
    /// Each cycle as the keys involved, sorted.
    pub cycles: Vec<Vec<String>>,
    /// Every key with dependencies before dependents. Empty when cycles exist.
    pub order: Vec<String>,
}

impl Analysis {
    /// Whether every formula in the sheet can be resolved.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.cycles.is_empty()
    }
}

/// Dependency graph of a sheet. Edges go from dependency to dependent.
pub struct SheetGraph<'a> {
    graph: DiGraph<&'a str, ()>,
    node_indices: FxHashMap<&'a str, NodeIndex>,
    missing: Vec<MissingReference>,
}

impl<'a> SheetGraph<'a> {
    /// Build the graph for `document`.
    pub fn build(document: &'a SheetDocument) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = FxHashMap::default();

        for key in document.keys() {
            node_indices.insert(key, graph.add_node(key));
        }

        let mut missing = Vec::new();
        for (key, spec) in &document.formulas {
            let consumer = node_indices[key.as_str()];
            for dep in &spec.args {
                match node_indices.get(dep.as_str()) {
                    // repeated arguments are one dependency
                    Some(&producer) => {
                        graph.update_edge(producer, consumer, ());
                    }
                    None => missing.push(MissingReference {
                        formula: key.clone(),
                        missing: dep.clone(),
                    }),
                }
            }
        }
        missing.sort_unstable();
        missing.dedup();

        Self {
            graph,
            node_indices,
            missing,
        }
    }

    /// Groups of keys that depend on each other, including self-references.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut keys: Vec<String> =
                    scc.iter().map(|&idx| self.graph[idx].to_string()).collect();
                keys.sort_unstable();
                keys
            })
            .collect();
        cycles.sort_unstable();
        cycles
    }

    /// Keys in dependency order, or `None` if the graph has a cycle.
    pub fn topological_order(&self) -> Option<Vec<String>> {
        toposort(&self.graph, None)
            .ok()
            .map(|nodes| nodes.into_iter().map(|idx| self.graph[idx].to_string()).collect())
    }

    /// Direct dependents of `key`.
    pub fn dependents(&self, key: &str) -> Vec<&'a str> {
        let mut dependents: Vec<&str> = self
            .node_indices
            .get(key)
            .map(|&idx| self.graph.neighbors(idx).map(|n| self.graph[n]).collect())
            .unwrap_or_default();
        dependents.sort_unstable();
        dependents
    }

    /// Collect missing references, cycles and order into an [`Analysis`].
    pub fn analyze(&self) -> Analysis {
        let cycles = self.cycles();
        let order = if cycles.is_empty() {
            self.topological_order().unwrap_or_default()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Analyzed {} keys: {} missing references, {} cycles",
            self.graph.node_count(),
            self.missing.len(),
            cycles.len()
        );

        Analysis {
            missing: self.missing.clone(),
            cycles,
            order,
        }
    }
}

/// Analyze a sheet's dependency structure.
pub fn analyze(document: &SheetDocument) -> Analysis {
    SheetGraph::build(document).analyze()
}
