//! Taxonomy graph derivation.
//!
//! A [`TaxonomyGraph`] is built from a record collection in three passes:
//!
//! 1. `builder` - one node per record, one `child -> parent` edge per
//!    declared `ChildOf` relation
//! 2. `classify` - table-driven styling of every node into a separate
//!    attribute map
//! 3. `extract` - bounded subgraphs around root records, rendered through
//!    `node_link` for the visualizer

mod builder;
mod classify;
mod extract;
mod models;
mod node_link;
mod style;

pub use builder::build_graph;
pub use classify::{classify, classify_missing, AnnotationSummary};
pub use extract::{extract_subgraphs, ExtractedSubgraph, Subgraph, Traversal};
pub use models::{LabelClass, NodeAttributes, NodeStyle};
pub use node_link::{NodeLinkEdge, NodeLinkGraph, NodeLinkNode};
pub use style::{fallback_style, StyleEntry, StyleTable, CAPEC_STYLES, CWE_STYLES};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::taxonomy::Taxonomy;

/// Directed specialization graph of one taxonomy.
///
/// Holds the adjacency (node IDs and `child -> parent` edges) and, apart from
/// it, the attribute map filled in by classification. Nodes are only ever
/// added, so indices stay stable for the lifetime of the graph.
#[derive(Debug, Clone)]
pub struct TaxonomyGraph {
    taxonomy: Taxonomy,
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    attributes: HashMap<NodeIndex, NodeAttributes>,
}

impl TaxonomyGraph {
    /// Creates an empty graph.
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            graph: DiGraph::new(),
            index: HashMap::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn taxonomy(&self) -> Taxonomy {
        self.taxonomy
    }

    /// Returns the node for `id`, adding it if missing.
    pub fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&ix) = self.index.get(id) {
            return ix;
        }
        let ix = self.graph.add_node(id.to_string());
        self.index.insert(id.to_string(), ix);
        ix
    }

    /// Adds a `child -> parent` edge, creating either endpoint if needed.
    ///
    /// Returns false if the edge was already present.
    pub fn add_edge(&mut self, child: &str, parent: &str) -> bool {
        let from = self.ensure_node(child);
        let to = self.ensure_node(parent);
        if self.graph.find_edge(from, to).is_some() {
            return false;
        }
        self.graph.add_edge(from, to, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn has_edge(&self, child: &str, parent: &str) -> bool {
        match (self.index.get(child), self.index.get(parent)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as `(child, parent)` ID pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.id_of(e.source()), self.id_of(e.target())))
    }

    /// Direct generalizations of `id` (targets of its `ChildOf` edges).
    pub fn parents(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, petgraph::Direction::Outgoing)
    }

    /// Direct specializations of `id`.
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, petgraph::Direction::Incoming)
    }

    /// Classification attributes of a node, once annotated.
    pub fn attributes(&self, id: &str) -> Option<&NodeAttributes> {
        self.index.get(id).and_then(|ix| self.attributes.get(ix))
    }

    /// Sets the attributes of an existing node.
    ///
    /// Returns false if `id` is not a node of this graph.
    pub fn set_attributes(&mut self, id: &str, attributes: NodeAttributes) -> bool {
        match self.index.get(id) {
            Some(&ix) => {
                self.attributes.insert(ix, attributes);
                true
            }
            None => false,
        }
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn id_of(&self, ix: NodeIndex) -> &str {
        &self.graph[ix]
    }

    pub(crate) fn attributes_at(&self, ix: NodeIndex) -> Option<&NodeAttributes> {
        self.attributes.get(&ix)
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    fn neighbors(&self, id: &str, direction: petgraph::Direction) -> Vec<&str> {
        let mut ids: Vec<&str> = match self.index.get(id) {
            Some(&ix) => self
                .graph
                .neighbors_directed(ix, direction)
                .map(|n| self.id_of(n))
                .collect(),
            None => Vec::new(),
        };
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_collapses_duplicates() {
        let mut graph = TaxonomyGraph::new(Taxonomy::Cwe);
        assert!(graph.add_edge("CWE-2", "CWE-1"));
        assert!(!graph.add_edge("CWE-2", "CWE-1"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_edge("CWE-2", "CWE-1"));
        assert!(!graph.has_edge("CWE-1", "CWE-2"));
    }

    #[test]
    fn test_ensure_node_is_idempotent() {
        let mut graph = TaxonomyGraph::new(Taxonomy::Capec);
        let a = graph.ensure_node("CAPEC-1");
        let b = graph.ensure_node("CAPEC-1");
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_parents_and_children() {
        let mut graph = TaxonomyGraph::new(Taxonomy::Cwe);
        graph.add_edge("CWE-3", "CWE-1");
        graph.add_edge("CWE-2", "CWE-1");
        graph.add_edge("CWE-3", "CWE-2");

        assert_eq!(graph.children("CWE-1"), vec!["CWE-2", "CWE-3"]);
        assert_eq!(graph.parents("CWE-3"), vec!["CWE-1", "CWE-2"]);
        assert!(graph.parents("CWE-404").is_empty());
    }

    #[test]
    fn test_set_attributes_requires_node() {
        let mut graph = TaxonomyGraph::new(Taxonomy::Cwe);
        let style = classify_missing(Taxonomy::Cwe, "CWE-9");
        let attrs = NodeAttributes::from_style(style, "CWE-9", "<b>CWE-9</b>");
        assert!(!graph.set_attributes("CWE-9", attrs.clone()));
        graph.ensure_node("CWE-9");
        assert!(graph.set_attributes("CWE-9", attrs));
        assert_eq!(graph.attributes("CWE-9").unwrap().size, 7);
    }
}
