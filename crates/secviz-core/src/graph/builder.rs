use crate::taxonomy::{Collection, TaxonomyRecord};

use super::TaxonomyGraph;

/// Builds the specialization graph of a collection.
///
/// Every record becomes a node and every `ChildOf` relation a
/// `child -> parent` edge. A parent missing from the collection still gets
/// a node (without attributes); repeated declarations yield a single edge.
/// The collection is left untouched.
pub fn build_graph<R: TaxonomyRecord>(collection: &Collection<R>) -> TaxonomyGraph {
    let mut graph = TaxonomyGraph::new(R::TAXONOMY);

    for record in collection.iter() {
        graph.ensure_node(record.id());
        for parent in record.parent_ids() {
            graph.add_edge(record.id(), parent);
        }
    }

    tracing::debug!(
        "Built {} graph: {} nodes, {} edges",
        R::TAXONOMY,
        graph.node_count(),
        graph.edge_count()
    );

    graph
}
