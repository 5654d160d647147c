use std::collections::BTreeMap;

use crate::graph::NodeLinkGraph;

use super::error::OutputError;
use super::{validate_name, GraphSink};

/// Keeps documents in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemoryGraphSink {
    graphs: BTreeMap<String, NodeLinkGraph>,
}

impl MemoryGraphSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&NodeLinkGraph> {
        self.graphs.get(name)
    }

    /// Stored document names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl GraphSink for MemoryGraphSink {
    fn write_graph(&mut self, name: &str, graph: &NodeLinkGraph) -> Result<(), OutputError> {
        validate_name(name)?;
        self.graphs.insert(name.to_string(), graph.clone());
        Ok(())
    }
}
