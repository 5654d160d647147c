//! Node-link JSON rendering.
//!
//! The document layout matches the classic node-link format: a `nodes`
//! list (each node carries its `id` plus flattened attributes) and a
//! `links` list of `source`/`target` pairs.
//!
//! ```json
//! {
//!   "directed": true,
//!   "multigraph": false,
//!   "graph": {},
//!   "nodes": [{"Description": "...", "color": "#db0054", "size": 30, "id": "CWE-284"}],
//!   "links": [{"source": "CWE-285", "target": "CWE-284"}]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::models::NodeAttributes;

/// A graph document ready to be written for the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub multigraph: bool,
    /// Graph-level attributes; always empty.
    pub graph: BTreeMap<String, String>,
    pub nodes: Vec<NodeLinkNode>,
    pub links: Vec<NodeLinkEdge>,
}

/// A node entry. Unannotated nodes serialize as a bare `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLinkNode {
    #[serde(flatten)]
    pub attributes: Option<NodeAttributes>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: String,
    pub target: String,
}

impl NodeLinkGraph {
    /// Assembles a directed document from nodes and `(source, target)` edges.
    pub fn from_parts<'a>(
        nodes: impl IntoIterator<Item = (&'a str, Option<&'a NodeAttributes>)>,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            directed: true,
            multigraph: false,
            graph: BTreeMap::new(),
            nodes: nodes
                .into_iter()
                .map(|(id, attributes)| NodeLinkNode {
                    attributes: attributes.cloned(),
                    id: id.to_string(),
                })
                .collect(),
            links: edges
                .into_iter()
                .map(|(source, target)| NodeLinkEdge {
                    source: source.to_string(),
                    target: target.to_string(),
                })
                .collect(),
        }
    }

    /// Serializes the document, indented when `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
