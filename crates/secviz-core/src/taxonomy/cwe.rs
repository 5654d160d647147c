//! CWE weakness records.

use serde::{Deserialize, Serialize};

use crate::graph::{StyleEntry, CWE_STYLES};

use super::{
    closed_enum, de_number, de_text, AbstractionLevel, Relation, RelationNature, Status, Taxonomy,
    TaxonomyRecord,
};

closed_enum! {
    /// Abstraction level of a CWE weakness, from most to least general.
    CweAbstraction {
        Pillar => "Pillar",
        Class => "Class",
        Base => "Base",
        Variant => "Variant",
        Compound => "Compound",
    }
}

impl AbstractionLevel for CweAbstraction {
    fn as_str(&self) -> &str {
        CweAbstraction::as_str(self)
    }

    fn is_known(&self) -> bool {
        CweAbstraction::is_known(self)
    }

    /// Pillars and classes each get their own descendant subgraph.
    fn is_extraction_root(&self) -> bool {
        matches!(self, CweAbstraction::Pillar | CweAbstraction::Class)
    }

    fn style(&self) -> &'static StyleEntry {
        CWE_STYLES.lookup(self)
    }
}

/// A relation from a weakness to another weakness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedCwe {
    #[serde(rename = "CWE_ID")]
    pub cwe_id: String,
    #[serde(rename = "Nature", default)]
    pub nature: RelationNature,
}

impl RelatedCwe {
    pub fn new(cwe_id: impl Into<String>, nature: RelationNature) -> Self {
        Self {
            cwe_id: cwe_id.into(),
            nature,
        }
    }
}

/// A CWE weakness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cwe {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(
        rename = "Number",
        default,
        deserialize_with = "de_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    #[serde(rename = "Abstraction", default)]
    pub abstraction: CweAbstraction,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Description", default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(rename = "Extended_Description", default)]
    pub extended_description: Option<String>,
    #[serde(rename = "Related_CWEs", default)]
    pub related: Option<Vec<RelatedCwe>>,
}

impl Cwe {
    /// Creates a weakness with no relations.
    pub fn new(id: impl Into<String>, name: impl Into<String>, abstraction: CweAbstraction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: None,
            abstraction,
            status: Status::Draft,
            description: String::new(),
            extended_description: None,
            related: None,
        }
    }

    /// Adds a `ChildOf` relation to `parent`.
    pub fn child_of(self, parent: impl Into<String>) -> Self {
        self.with_relation(parent, RelationNature::ChildOf)
    }

    /// Adds a relation of any nature.
    pub fn with_relation(mut self, target: impl Into<String>, nature: RelationNature) -> Self {
        self.related
            .get_or_insert_with(Vec::new)
            .push(RelatedCwe::new(target, nature));
        self
    }
}

impl TaxonomyRecord for Cwe {
    const TAXONOMY: Taxonomy = Taxonomy::Cwe;
    type Abstraction = CweAbstraction;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn explicit_number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    fn abstraction(&self) -> &CweAbstraction {
        &self.abstraction
    }

    fn status(&self) -> &Status {
        &self.status
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn relations(&self) -> Vec<Relation<'_>> {
        self.related
            .iter()
            .flatten()
            .map(|r| Relation {
                target: &r.cwe_id,
                nature: &r.nature,
            })
            .collect()
    }
}
