//! Subgraph extraction around root records.
//!
//! CAPEC clusters are connected components: a Meta pattern pulls in its
//! specializations and its generalizations alike. CWE clusters follow edges
//! backward only, collecting a Pillar or Class together with everything that
//! specializes it.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::taxonomy::{Collection, Taxonomy, TaxonomyRecord};

use super::models::NodeAttributes;
use super::node_link::NodeLinkGraph;
use super::TaxonomyGraph;

/// How reachability is computed from a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Follow edges in both directions.
    Undirected,
    /// Follow edges against their direction (`parent -> child`).
    Reverse,
}

impl Traversal {
    /// Traversal used for a taxonomy's root records.
    pub fn for_taxonomy(taxonomy: Taxonomy) -> Self {
        match taxonomy {
            Taxonomy::Capec => Traversal::Undirected,
            Taxonomy::Cwe => Traversal::Reverse,
        }
    }
}

/// Breadth-first reachable set from `start`, including `start`.
fn reachable_from(
    graph: &DiGraph<String, ()>,
    start: NodeIndex,
    traversal: Traversal,
) -> BTreeSet<NodeIndex> {
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        let neighbors = match traversal {
            Traversal::Undirected => graph.neighbors_undirected(node),
            Traversal::Reverse => graph.neighbors_directed(node, Direction::Incoming),
        };
        for next in neighbors {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

/// A node-induced view over a [`TaxonomyGraph`].
///
/// Holds only the selected node set; edges and attributes are read from the
/// underlying graph, so edge directions are those of the full graph.
#[derive(Debug, Clone)]
pub struct Subgraph<'g> {
    graph: &'g TaxonomyGraph,
    nodes: BTreeSet<NodeIndex>,
}

impl<'g> Subgraph<'g> {
    pub fn taxonomy(&self) -> Taxonomy {
        self.graph.taxonomy()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph
            .index_of(id)
            .is_some_and(|ix| self.nodes.contains(&ix))
    }

    /// Node IDs in graph insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &'g str> + '_ {
        let graph = self.graph;
        self.nodes.iter().map(move |&ix| graph.id_of(ix))
    }

    /// Edges with both endpoints in the view, as `(child, parent)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&'g str, &'g str)> + '_ {
        let graph = self.graph;
        let nodes = &self.nodes;
        graph
            .inner()
            .edge_references()
            .filter(move |e| nodes.contains(&e.source()) && nodes.contains(&e.target()))
            .map(move |e| (graph.id_of(e.source()), graph.id_of(e.target())))
    }

    /// Node IDs as an owned, ordered set.
    pub fn node_set(&self) -> BTreeSet<String> {
        self.node_ids().map(str::to_string).collect()
    }

    /// Edges as an owned, ordered set.
    pub fn edge_set(&self) -> BTreeSet<(String, String)> {
        self.edges()
            .map(|(child, parent)| (child.to_string(), parent.to_string()))
            .collect()
    }

    pub fn attributes(&self, id: &str) -> Option<&'g NodeAttributes> {
        let ix = self.graph.index_of(id)?;
        if !self.nodes.contains(&ix) {
            return None;
        }
        self.graph.attributes_at(ix)
    }

    /// Renders the view as a node-link document.
    pub fn to_node_link(&self) -> NodeLinkGraph {
        let graph = self.graph;
        NodeLinkGraph::from_parts(
            self.nodes
                .iter()
                .map(|&ix| (graph.id_of(ix), graph.attributes_at(ix))),
            self.edges(),
        )
    }
}

impl TaxonomyGraph {
    /// View over the whole graph.
    pub fn full_view(&self) -> Subgraph<'_> {
        Subgraph {
            graph: self,
            nodes: self.inner().node_indices().collect(),
        }
    }

    /// View over an explicit node set; unknown IDs are ignored.
    pub fn subgraph<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Subgraph<'_> {
        Subgraph {
            graph: self,
            nodes: ids.into_iter().filter_map(|id| self.index_of(id)).collect(),
        }
    }

    /// Subgraph induced by everything reachable from `root`.
    ///
    /// Returns `None` if `root` is not a node. An isolated root yields a
    /// single-node subgraph.
    pub fn extract(&self, root: &str, traversal: Traversal) -> Option<Subgraph<'_>> {
        let start = self.index_of(root)?;
        Some(Subgraph {
            graph: self,
            nodes: reachable_from(self.inner(), start, traversal),
        })
    }
}

/// A subgraph paired with the root it was extracted from.
#[derive(Debug, Clone)]
pub struct ExtractedSubgraph<'g> {
    pub root_id: String,
    /// Attributes of the root node, if the graph was annotated.
    pub root: Option<&'g NodeAttributes>,
    pub subgraph: Subgraph<'g>,
}

impl ExtractedSubgraph<'_> {
    /// Document name for this subgraph (the root ID).
    pub fn name(&self) -> &str {
        &self.root_id
    }

    /// Output file name (`<root-id>.json`).
    pub fn file_name(&self) -> String {
        format!("{}.json", self.root_id)
    }
}

/// Extracts one subgraph per root record of `collection`, in ID order.
///
/// Roots are Meta patterns for CAPEC and Pillar/Class weaknesses for CWE;
/// the traversal follows [`Traversal::for_taxonomy`].
pub fn extract_subgraphs<'g, R: TaxonomyRecord>(
    graph: &'g TaxonomyGraph,
    collection: &Collection<R>,
) -> Vec<ExtractedSubgraph<'g>> {
    let traversal = Traversal::for_taxonomy(R::TAXONOMY);
    let mut extracted = Vec::new();

    for root in collection.roots() {
        match graph.extract(root.id(), traversal) {
            Some(subgraph) => extracted.push(ExtractedSubgraph {
                root_id: root.id().to_string(),
                root: graph.attributes(root.id()),
                subgraph,
            }),
            None => tracing::warn!("Root {} is not part of the {} graph", root.id(), R::TAXONOMY),
        }
    }

    extracted
}
