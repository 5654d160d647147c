use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::NodeLinkGraph;

use super::error::OutputError;
use super::{validate_name, GraphSink};

/// Writes each document to `<graph_dir>/<name>.json`.
///
/// ```text
/// gen/graphs/
///   CWE-FULL.json        # full CWE graph
///   CAPEC-FULL.json      # full CAPEC graph
///   CWE-284.json         # one file per Pillar/Class weakness
///   CAPEC-152.json       # one file per Meta attack pattern
/// ```
pub struct FileGraphSink {
    graph_dir: PathBuf,
    pretty: bool,
    written: Vec<PathBuf>,
}

impl FileGraphSink {
    /// Creates a sink writing indented JSON into `graph_dir`.
    pub fn new(graph_dir: impl Into<PathBuf>) -> Self {
        Self {
            graph_dir: graph_dir.into(),
            pretty: true,
            written: Vec::new(),
        }
    }

    /// Selects indented or compact JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn graph_dir(&self) -> &Path {
        &self.graph_dir
    }

    /// Paths written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path a document name maps to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.graph_dir.join(format!("{}.json", name))
    }

    /// Ensures the output directory exists.
    fn ensure_graph_dir(&self) -> Result<(), OutputError> {
        if !self.graph_dir.exists() {
            fs::create_dir_all(&self.graph_dir).map_err(|e| OutputError::io(&self.graph_dir, e))?;
        }
        Ok(())
    }
}

impl GraphSink for FileGraphSink {
    fn write_graph(&mut self, name: &str, graph: &NodeLinkGraph) -> Result<(), OutputError> {
        validate_name(name)?;
        self.ensure_graph_dir()?;

        let path = self.path_for(name);
        let json = graph.to_json(self.pretty)?;
        fs::write(&path, json).map_err(|e| OutputError::io(&path, e))?;

        tracing::debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
