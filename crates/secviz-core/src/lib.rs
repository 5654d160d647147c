pub mod config;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod taxonomy;

pub use config::{Config, ConfigError};
pub use graph::{build_graph, extract_subgraphs, NodeAttributes, NodeLinkGraph, TaxonomyGraph};
pub use output::{FileGraphSink, GraphSink, MemoryGraphSink, OutputError};
pub use pipeline::{IndexEntry, PipelineError, RunReport, SubgraphSummary, TaxonomyPipeline};
pub use taxonomy::{AttackPattern, Collection, Cwe, Taxonomy, TaxonomyError, TaxonomyRecord};
