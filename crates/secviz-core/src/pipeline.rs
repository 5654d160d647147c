use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::graph::{build_graph, extract_subgraphs, NodeAttributes};
use crate::output::{GraphSink, OutputError};
use crate::taxonomy::{Collection, RecordIssue, Taxonomy, TaxonomyError, TaxonomyRecord};

/// Runs the derivation for one taxonomy at a time.
///
/// A run loads (or takes) a collection, builds and annotates the full graph,
/// extracts one subgraph per root and hands every document to the sink:
/// first `<TAXONOMY>-FULL`, then the subgraphs in root ID order.
pub struct TaxonomyPipeline<S: GraphSink> {
    sink: S,
}

impl<S: GraphSink> TaxonomyPipeline<S> {
    /// Creates a pipeline writing into the given sink.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Loads a collection file and runs it.
    ///
    /// Record-level problems end up in [`RunReport::issues`]; only unreadable
    /// or structurally invalid files fail the run.
    pub fn run_file<R: TaxonomyRecord>(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<RunReport, PipelineError> {
        let path = path.as_ref();
        tracing::info!("Loading {} records from {}", R::TAXONOMY, path.display());

        let (collection, load) = Collection::<R>::from_file(path)?;
        let mut report = self.run(&collection)?;
        report.issues = load.issues;
        Ok(report)
    }

    /// Derives and writes all graph documents for a collection.
    pub fn run<R: TaxonomyRecord>(
        &mut self,
        collection: &Collection<R>,
    ) -> Result<RunReport, PipelineError> {
        let taxonomy = R::TAXONOMY;

        let mut graph = build_graph(collection);
        tracing::info!(
            "Built {} graph: {} nodes, {} edges",
            taxonomy,
            graph.node_count(),
            graph.edge_count()
        );

        let annotation = graph.annotate(collection);
        tracing::info!(
            "Classified {} nodes ({} dangling, {} unknown abstraction)",
            annotation.classified,
            annotation.dangling.len(),
            annotation.unknown_abstraction.len()
        );

        self.sink
            .write_graph(&taxonomy.full_graph_name(), &graph.full_view().to_node_link())?;

        let extracted = extract_subgraphs(&graph, collection);
        let mut subgraphs = Vec::with_capacity(extracted.len());
        for entry in &extracted {
            self.sink
                .write_graph(entry.name(), &entry.subgraph.to_node_link())?;
            subgraphs.push(SubgraphSummary {
                root_id: entry.root_id.clone(),
                root: entry.root.cloned(),
                parents: graph
                    .parents(&entry.root_id)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                file_name: entry.file_name(),
                nodes: entry.subgraph.node_count(),
                edges: entry.subgraph.edge_count(),
            });
        }
        tracing::info!("Wrote {} {} subgraphs", subgraphs.len(), taxonomy);

        Ok(RunReport {
            taxonomy,
            records: collection.len(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            dangling: annotation.dangling,
            unknown_abstraction: annotation.unknown_abstraction,
            subgraphs,
            issues: Vec::new(),
        })
    }
}

/// One written subgraph: the root's attributes plus what an index needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SubgraphSummary {
    pub root_id: String,
    pub root: Option<NodeAttributes>,
    /// Direct `ChildOf` targets of the root, sorted.
    pub parents: Vec<String>,
    pub file_name: String,
    pub nodes: usize,
    pub edges: usize,
}

impl SubgraphSummary {
    /// Display name of the root, falling back to its ID.
    pub fn name(&self) -> &str {
        self.root
            .as_ref()
            .map(|attrs| attrs.label.as_str())
            .unwrap_or(self.root_id.as_str())
    }
}

/// A top-level root in a run's index with the roots that specialize it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<'a> {
    pub root: &'a SubgraphSummary,
    pub children: Vec<&'a SubgraphSummary>,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub taxonomy: Taxonomy,
    /// Records admitted into the collection.
    pub records: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Relationship targets with no backing record.
    pub dangling: Vec<String>,
    pub unknown_abstraction: Vec<String>,
    pub subgraphs: Vec<SubgraphSummary>,
    /// Records excluded while loading.
    pub issues: Vec<RecordIssue>,
}

impl RunReport {
    /// Number of documents written (full graph included).
    pub fn documents(&self) -> usize {
        self.subgraphs.len() + 1
    }

    /// Subgraphs arranged for an index, ordered by root name.
    ///
    /// A root whose parent is another root (a CWE Class under its Pillar) is
    /// nested under every such parent. Roots without a root parent, or whose
    /// root parents are themselves nested, are listed at the top level.
    pub fn index(&self) -> Vec<IndexEntry<'_>> {
        let root_ids: HashSet<&str> = self.subgraphs.iter().map(|s| s.root_id.as_str()).collect();
        let has_root_parent =
            |s: &SubgraphSummary| s.parents.iter().any(|p| root_ids.contains(p.as_str()));

        let mut placed = HashSet::new();
        let mut entries: Vec<IndexEntry<'_>> = Vec::new();
        for top in self.subgraphs.iter().filter(|s| !has_root_parent(*s)) {
            let mut children: Vec<&SubgraphSummary> = self
                .subgraphs
                .iter()
                .filter(|s| s.parents.iter().any(|p| *p == top.root_id))
                .collect();
            children.sort_by(|a, b| by_name(a, b));
            placed.insert(top.root_id.as_str());
            placed.extend(children.iter().map(|c| c.root_id.as_str()));
            entries.push(IndexEntry {
                root: top,
                children,
            });
        }

        for orphan in &self.subgraphs {
            if !placed.contains(orphan.root_id.as_str()) {
                entries.push(IndexEntry {
                    root: orphan,
                    children: Vec::new(),
                });
            }
        }

        entries.sort_by(|a, b| by_name(a.root, b.root));
        entries
    }
}

fn by_name(a: &SubgraphSummary, b: &SubgraphSummary) -> std::cmp::Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.root_id.cmp(&b.root_id))
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
