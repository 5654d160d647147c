//! Node classification.
//!
//! Styling is a pure lookup in the taxonomy's style table; annotation
//! applies it to every node of a built graph.

use crate::taxonomy::{AbstractionLevel, Collection, Taxonomy, TaxonomyRecord};

use super::models::{NodeAttributes, NodeStyle};
use super::style::fallback_style;
use super::TaxonomyGraph;

/// Classifies a record by its abstraction level.
///
/// Levels outside the taxonomy's enumeration get the table's fallback entry.
pub fn classify<R: TaxonomyRecord>(record: &R) -> NodeStyle {
    let taxonomy = R::TAXONOMY;
    let abstraction = record.abstraction();
    let entry = abstraction.style();

    NodeStyle {
        color: entry.color,
        size: entry.size,
        label_class: entry.label_class,
        taxonomy,
        abstraction: Some(abstraction.as_str().to_string()),
        url: taxonomy.definition_url(record.number()),
    }
}

/// Classifies a node that has no backing record (a dangling `ChildOf` target).
pub fn classify_missing(taxonomy: Taxonomy, id: &str) -> NodeStyle {
    let entry = fallback_style(taxonomy);
    NodeStyle {
        color: entry.color,
        size: entry.size,
        label_class: entry.label_class,
        taxonomy,
        abstraction: None,
        url: taxonomy.definition_url(taxonomy.number_from_id(id)),
    }
}

/// Outcome of annotating a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    /// Nodes styled from a backing record.
    pub classified: usize,
    /// Records whose abstraction level was not recognized.
    pub unknown_abstraction: Vec<String>,
    /// Nodes with no backing record.
    pub dangling: Vec<String>,
}

impl TaxonomyGraph {
    /// Attaches classification attributes to every node.
    ///
    /// Nodes without a record in `collection` receive the fallback style and
    /// are listed in the summary; annotation never fails.
    pub fn annotate<R: TaxonomyRecord>(&mut self, collection: &Collection<R>) -> AnnotationSummary {
        let mut summary = AnnotationSummary::default();

        let ids: Vec<String> = self.node_ids().map(str::to_string).collect();
        for id in ids {
            let attributes = match collection.get(&id) {
                Some(record) => {
                    summary.classified += 1;
                    if !record.abstraction().is_known() {
                        summary.unknown_abstraction.push(id.clone());
                    }
                    NodeAttributes::from_style(
                        classify(record),
                        record.name(),
                        format!(
                            "<b>{}: {}</b><br>{}",
                            record.id(),
                            record.name(),
                            record.description()
                        ),
                    )
                }
                None => {
                    summary.dangling.push(id.clone());
                    NodeAttributes::from_style(
                        classify_missing(R::TAXONOMY, &id),
                        id.as_str(),
                        format!("<b>{}</b>", id),
                    )
                }
            };
            self.set_attributes(&id, attributes);
        }

        if !summary.dangling.is_empty() {
            tracing::warn!(
                "{} {} nodes have no backing record: {}",
                summary.dangling.len(),
                R::TAXONOMY,
                summary.dangling.join(", ")
            );
        }
        if !summary.unknown_abstraction.is_empty() {
            tracing::warn!(
                "{} {} records have an unrecognized abstraction",
                summary.unknown_abstraction.len(),
                R::TAXONOMY
            );
        }

        summary
    }
}
