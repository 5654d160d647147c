//! CAPEC attack pattern records.
//!
//! Besides the shared record fields, attack patterns carry descriptive data
//! (prerequisites, skills, mitigations, execution flow) that the graph does
//! not use but other consumers read from the same collection.

use serde::{Deserialize, Serialize};

use crate::graph::{StyleEntry, CAPEC_STYLES};

use super::{
    closed_enum, de_number, de_text, AbstractionLevel, Relation, RelationNature, Status, Taxonomy,
    TaxonomyRecord,
};

closed_enum! {
    /// Abstraction level of a CAPEC attack pattern.
    CapecAbstraction {
        Meta => "Meta",
        Standard => "Standard",
        Detailed => "Detailed",
    }
}

impl AbstractionLevel for CapecAbstraction {
    fn as_str(&self) -> &str {
        CapecAbstraction::as_str(self)
    }

    fn is_known(&self) -> bool {
        CapecAbstraction::is_known(self)
    }

    /// Meta patterns root one connected-component subgraph each.
    fn is_extraction_root(&self) -> bool {
        matches!(self, CapecAbstraction::Meta)
    }

    fn style(&self) -> &'static StyleEntry {
        CAPEC_STYLES.lookup(self)
    }
}

/// A relation from an attack pattern to another attack pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedAttackPattern {
    #[serde(rename = "CAPEC_ID")]
    pub capec_id: String,
    #[serde(rename = "Nature", default)]
    pub nature: RelationNature,
}

/// Skill level needed to carry out a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequired {
    #[serde(rename = "Level", default)]
    pub level: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

/// One step of an attack's execution flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackStep {
    #[serde(rename = "Step", default)]
    pub step: Option<String>,
    #[serde(rename = "Phase", default)]
    pub phase: Option<String>,
    #[serde(rename = "Description", default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(rename = "Techniques", default)]
    pub techniques: Vec<String>,
}

/// A CAPEC attack pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPattern {
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
    pub abstraction: CapecAbstraction,
    #[serde(rename = "Status", default)]
    pub status: Status,
    #[serde(rename = "Description", default, deserialize_with = "de_text")]
    pub description: String,
    #[serde(rename = "Extended_Description", default)]
    pub extended_description: Option<String>,
    #[serde(rename = "Likelihood_Of_Attack", default)]
    pub likelihood_of_attack: Option<String>,
    #[serde(rename = "Typical_Severity", default)]
    pub typical_severity: Option<String>,
    #[serde(rename = "Related_Attack_Patterns", default)]
    pub related: Option<Vec<RelatedAttackPattern>>,
    #[serde(rename = "Prerequisites", default)]
    pub prerequisites: Option<Vec<String>>,
    #[serde(rename = "Skills_Required", default)]
    pub skills_required: Option<Vec<SkillRequired>>,
    #[serde(rename = "Resources_Required", default)]
    pub resources_required: Option<Vec<String>>,
    #[serde(rename = "Mitigations", default)]
    pub mitigations: Option<Vec<String>>,
    /// CWE IDs (`CWE-…`) this pattern exploits.
    #[serde(rename = "Related_Weaknesses", default)]
    pub related_weaknesses: Option<Vec<String>>,
    #[serde(rename = "Execution_Flow", default)]
    pub execution_flow: Option<Vec<AttackStep>>,
}

impl AttackPattern {
    /// Creates an attack pattern with no relations or descriptive data.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        abstraction: CapecAbstraction,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: None,
            abstraction,
            status: Status::Draft,
            description: String::new(),
            extended_description: None,
            likelihood_of_attack: None,
            typical_severity: None,
            related: None,
            prerequisites: None,
            skills_required: None,
            resources_required: None,
            mitigations: None,
            related_weaknesses: None,
            execution_flow: None,
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
            .push(RelatedAttackPattern {
                capec_id: target.into(),
                nature,
            });
        self
    }
}

impl TaxonomyRecord for AttackPattern {
    const TAXONOMY: Taxonomy = Taxonomy::Capec;
    type Abstraction = CapecAbstraction;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn explicit_number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    fn abstraction(&self) -> &CapecAbstraction {
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
                target: &r.capec_id,
                nature: &r.nature,
            })
            .collect()
    }
}
