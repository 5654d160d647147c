//! Node classification types.
//!
//! Field names of [`NodeAttributes`] are the keys the d3 visualizer reads
//! from each node of a node-link document.

use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// Size class of a node label.
///
/// `Error` marks nodes whose abstraction fell outside the taxonomy's known
/// levels, so bad data stays distinguishable from legitimately small nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelClass {
    #[serde(rename = "node-label-big")]
    Big,
    #[serde(rename = "node-label-medium")]
    Medium,
    #[serde(rename = "node-label-small")]
    Small,
    #[serde(rename = "error")]
    Error,
}

/// Visual classification of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStyle {
    /// Hex fill color.
    pub color: &'static str,
    /// Node radius.
    pub size: u32,
    pub label_class: LabelClass,
    pub taxonomy: Taxonomy,
    /// Abstraction text of the record; `None` for nodes without a record.
    pub abstraction: Option<String>,
    /// MITRE definition page.
    pub url: String,
}

/// Attributes attached to a graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Tooltip HTML: bold `ID: Name` header followed by the description.
    #[serde(rename = "Description")]
    pub description: String,
    pub color: String,
    pub size: u32,
    pub label: String,
    pub label_class: LabelClass,
    #[serde(rename = "type")]
    pub taxonomy: Taxonomy,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub abstraction: Option<String>,
    pub url: String,
}

impl NodeAttributes {
    pub fn from_style(
        style: NodeStyle,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            color: style.color.to_string(),
            size: style.size,
            label: label.into(),
            label_class: style.label_class,
            taxonomy: style.taxonomy,
            abstraction: style.abstraction,
            url: style.url,
        }
    }
}
