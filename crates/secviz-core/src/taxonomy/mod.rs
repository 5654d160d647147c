//! Taxonomy record model.
//!
//! CWE weaknesses and CAPEC attack patterns share one record shape: a stable
//! ID, a display name, an abstraction level and an ordered list of typed
//! relations to other records. The two taxonomies differ only in their
//! abstraction enumeration and a handful of extra CAPEC fields.
//!
//! ## Modules
//!
//! - `cwe` - CWE weakness records
//! - `capec` - CAPEC attack pattern records
//! - `collection` - ID-keyed record collections and lenient JSON loading
//! - `error` - collection-level failures

mod capec;
mod collection;
mod cwe;
mod error;

pub use capec::*;
pub use collection::{Collection, LoadReport, RecordIssue};
pub use cwe::*;
pub use error::TaxonomyError;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::StyleEntry;

/// Declares a closed enumeration parsed from free text.
///
/// Every known value gets a variant; anything else lands in `Unknown` with
/// the raw text preserved, so parsing never fails on unexpected data.
macro_rules! closed_enum {
    (@first $first:literal $(| $rest:literal)*) => { $first };
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $($text:literal)|+),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "Option<String>", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value outside the known set, kept verbatim.
            Unknown(String),
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical text of this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => closed_enum!(@first $($text)|+),)+
                    Self::Unknown(raw) => raw,
                }
            }

            /// Returns false for values that fell outside the known set.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<Option<String>> for $name {
            fn from(raw: Option<String>) -> Self {
                let raw = raw.unwrap_or_default();
                match raw.trim() {
                    $($($text)|+ => Self::$variant,)+
                    _ => Self::Unknown(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(Some(raw.to_string()))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Unknown(String::new())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use closed_enum;

// =============================================================================
// Taxonomy
// =============================================================================

/// The two supported taxonomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Taxonomy {
    #[serde(rename = "CWE")]
    Cwe,
    #[serde(rename = "CAPEC")]
    Capec,
}

impl Taxonomy {
    /// Short display name, also used as the node `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Cwe => "CWE",
            Taxonomy::Capec => "CAPEC",
        }
    }

    /// Prefix carried by every record ID of this taxonomy.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Taxonomy::Cwe => "CWE-",
            Taxonomy::Capec => "CAPEC-",
        }
    }

    /// Top-level key of the collection object in the JSON input.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Taxonomy::Cwe => "CWEs",
            Taxonomy::Capec => "Capecs",
        }
    }

    /// MITRE definition page for a native record number.
    pub fn definition_url(&self, number: &str) -> String {
        match self {
            Taxonomy::Cwe => format!("https://cwe.mitre.org/data/definitions/{}.html", number),
            Taxonomy::Capec => format!("https://capec.mitre.org/data/definitions/{}.html", number),
        }
    }

    /// Native number of an ID (`"CWE-79"` -> `"79"`).
    ///
    /// IDs without the taxonomy prefix are returned unchanged.
    pub fn number_from_id<'a>(&self, id: &'a str) -> &'a str {
        id.strip_prefix(self.id_prefix()).unwrap_or(id)
    }

    /// Name of the full-graph document (`CWE-FULL`, `CAPEC-FULL`).
    pub fn full_graph_name(&self) -> String {
        format!("{}-FULL", self.as_str())
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Shared Enumerations
// =============================================================================

closed_enum! {
    /// Lifecycle status of a record.
    Status {
        Deprecated => "Deprecated",
        Draft => "Draft",
        Incomplete => "Incomplete",
        Obsolete => "Obsolete",
        Stable => "Stable",
        Usable => "Usable",
    }
}

closed_enum! {
    /// Nature of a relation between two records of the same taxonomy.
    ///
    /// Only `ChildOf` shapes the graph; the rest are kept for other consumers.
    RelationNature {
        /// The source is a more specific form of the target.
        ChildOf => "ChildOf",
        ParentOf => "ParentOf" | "ParentOF",
        StartsWith => "StartsWith",
        CanFollow => "CanFollow",
        CanPrecede => "CanPrecede",
        RequiredBy => "RequiredBy",
        Requires => "Requires",
        CanAlsoBe => "CanAlsoBe",
        PeerOf => "PeerOf",
    }
}

/// A typed relation from a record to another record ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation<'a> {
    pub target: &'a str,
    pub nature: &'a RelationNature,
}

// =============================================================================
// Record Traits
// =============================================================================

/// An abstraction level enumeration of one taxonomy.
pub trait AbstractionLevel {
    /// Text of the level as it appears in the source data.
    fn as_str(&self) -> &str;

    /// Whether the level belongs to the taxonomy's closed set.
    fn is_known(&self) -> bool;

    /// Whether records at this level root an extracted subgraph.
    fn is_extraction_root(&self) -> bool;

    /// Style of nodes at this level; unknown levels get the fallback entry.
    fn style(&self) -> &'static StyleEntry;
}

/// A record of a taxonomy collection.
pub trait TaxonomyRecord: DeserializeOwned {
    /// Taxonomy this record belongs to.
    const TAXONOMY: Taxonomy;

    /// Abstraction enumeration of the taxonomy.
    type Abstraction: AbstractionLevel;

    /// Stable unique ID, used as graph node identity.
    fn id(&self) -> &str;

    /// Human label.
    fn name(&self) -> &str;

    /// Native number as given by the source, if any.
    fn explicit_number(&self) -> Option<&str>;

    fn abstraction(&self) -> &Self::Abstraction;

    fn status(&self) -> &Status;

    /// Flattened description text.
    fn description(&self) -> &str;

    /// All declared relations, in declaration order.
    fn relations(&self) -> Vec<Relation<'_>>;

    /// Native number used in definition URLs.
    ///
    /// Falls back to the ID without its taxonomy prefix.
    fn number(&self) -> &str {
        self.explicit_number()
            .unwrap_or_else(|| Self::TAXONOMY.number_from_id(self.id()))
    }

    /// Targets of `ChildOf` relations, in declaration order (duplicates kept).
    fn parent_ids(&self) -> Vec<&str> {
        self.relations()
            .into_iter()
            .filter(|r| *r.nature == RelationNature::ChildOf)
            .map(|r| r.target)
            .collect()
    }
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Accepts a record number given either as a JSON integer or a string.
pub(crate) fn de_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Int(u64),
        Text(String),
    }

    Ok(Option::<RawNumber>::deserialize(deserializer)?.map(|raw| match raw {
        RawNumber::Int(n) => n.to_string(),
        RawNumber::Text(s) => s.trim().to_string(),
    }))
}

/// Reads a text field, treating `null` as empty.
pub(crate) fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
