use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

use super::{AbstractionLevel, Status, Taxonomy, TaxonomyError, TaxonomyRecord};
use crate::output::validate_name;

/// A record that could not be admitted into a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    /// Key of the record in the source object (or its ID).
    pub key: String,
    /// Why the record was excluded.
    pub reason: String,
}

impl RecordIssue {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Outcome of loading a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub taxonomy: Taxonomy,
    /// Number of records admitted.
    pub loaded: usize,
    /// Records that were excluded, in source order.
    pub issues: Vec<RecordIssue>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// All records of one taxonomy, keyed and ordered by ID.
///
/// The ordering makes every derivation over the collection deterministic.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: BTreeMap<String, R>,
}

impl<R: TaxonomyRecord> Collection<R> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Adds a record, rejecting empty or already-present IDs.
    ///
    /// Every ID names an output document, so IDs that are not valid document
    /// names (or that collide with the full graph) are rejected here.
    pub fn insert(&mut self, record: R) -> Result<(), RecordIssue> {
        let id = record.id().to_string();
        if id.trim().is_empty() {
            return Err(RecordIssue::new(record.name(), "empty ID"));
        }
        if validate_name(&id).is_err() || id == R::TAXONOMY.full_graph_name() {
            return Err(RecordIssue::new(id, "ID not usable as a document name"));
        }
        if record.name().trim().is_empty() {
            return Err(RecordIssue::new(id, "empty name"));
        }
        if self.records.contains_key(&id) {
            return Err(RecordIssue::new(id, "duplicate ID"));
        }

        self.records.insert(id, record);
        Ok(())
    }

    /// Parses a collection document (`{"CWEs": {...}}` / `{"Capecs": {...}}`).
    ///
    /// The document structure must be valid; individual records that fail to
    /// deserialize are excluded and listed in the report.
    pub fn from_json_str(json: &str) -> Result<(Self, LoadReport), TaxonomyError> {
        let taxonomy = R::TAXONOMY;
        let document: Value = serde_json::from_str(json)
            .map_err(|source| TaxonomyError::Json { taxonomy, source })?;

        let key = taxonomy.collection_key();
        let entries = document
            .get(key)
            .and_then(Value::as_object)
            .ok_or(TaxonomyError::MissingCollection { taxonomy, key })?;

        let mut collection = Self::new();
        let mut issues = Vec::new();

        for (entry_key, raw) in entries {
            match serde_json::from_value::<R>(raw.clone()) {
                Ok(record) => {
                    if let Err(issue) = collection.insert(record) {
                        issues.push(issue);
                    }
                }
                Err(e) => issues.push(RecordIssue::new(entry_key, e.to_string())),
            }
        }

        if !issues.is_empty() {
            tracing::warn!(
                "Excluded {} of {} {} records",
                issues.len(),
                entries.len(),
                taxonomy
            );
            for issue in &issues {
                tracing::debug!("Excluded {} record {}", taxonomy, issue);
            }
        }

        let report = LoadReport {
            taxonomy,
            loaded: collection.len(),
            issues,
        };

        Ok((collection, report))
    }

    /// Reads and parses a collection document from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, LoadReport), TaxonomyError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| TaxonomyError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    /// Records whose abstraction level roots an extracted subgraph.
    pub fn roots(&self) -> impl Iterator<Item = &R> {
        self.iter().filter(|r| r.abstraction().is_extraction_root())
    }

    /// Records with the given lifecycle status.
    pub fn with_status<'a>(&'a self, status: &'a Status) -> impl Iterator<Item = &'a R> + 'a {
        self.iter().filter(move |r| r.status() == status)
    }
}

impl<R: TaxonomyRecord> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects records, skipping any that [`Collection::insert`] rejects.
impl<R: TaxonomyRecord> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            if let Err(issue) = collection.insert(record) {
                tracing::warn!("Skipping {} record {}", R::TAXONOMY, issue);
            }
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{AttackPattern, CapecAbstraction, Cwe, CweAbstraction};

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut collection = Collection::new();
        collection
            .insert(Cwe::new("CWE-1", "One", CweAbstraction::Base))
            .unwrap();
        let issue = collection
            .insert(Cwe::new("CWE-1", "Again", CweAbstraction::Base))
            .unwrap_err();
        assert_eq!(issue.key, "CWE-1");
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("CWE-1").unwrap().name, "One");
    }

    #[test]
    fn test_insert_rejects_empty_id() {
        let mut collection = Collection::new();
        assert!(collection
            .insert(AttackPattern::new("", "Nameless", CapecAbstraction::Meta))
            .is_err());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_insert_rejects_unusable_document_names() {
        let mut collection = Collection::new();
        for id in ["CWE 2", "../CWE-2", "CWE-FULL"] {
            let issue = collection
                .insert(Cwe::new(id, "Unusable", CweAbstraction::Class))
                .unwrap_err();
            assert_eq!(issue.key, id);
            assert_eq!(issue.reason, "ID not usable as a document name");
        }
        assert!(collection.is_empty());

        collection
            .insert(Cwe::new("CWE-2", "Usable", CweAbstraction::Class))
            .unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_roots_and_status() {
        let collection: Collection<Cwe> = vec![
            Cwe::new("CWE-1", "Pillar", CweAbstraction::Pillar),
            Cwe::new("CWE-2", "Class", CweAbstraction::Class),
            Cwe::new("CWE-3", "Base", CweAbstraction::Base),
        ]
        .into_iter()
        .collect();

        let roots: Vec<&str> = collection.roots().map(|r| r.id.as_str()).collect();
        assert_eq!(roots, vec!["CWE-1", "CWE-2"]);
        assert_eq!(collection.with_status(&Status::Draft).count(), 3);
        assert_eq!(collection.with_status(&Status::Stable).count(), 0);
    }

    #[test]
    fn test_bad_records_are_reported() {
        let json = r#"{"CWEs": {
            "CWE-1": {"ID": "CWE-1", "Name": "Good", "Number": 1, "Abstraction": "Pillar"},
            "CWE-2": {"ID": "CWE-2", "Abstraction": "Class"},
            "CWE-3": "not a record"
        }}"#;

        let (collection, report) = Collection::<Cwe>::from_json_str(json).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.issues.len(), 2);
        assert!(!report.is_clean());
        assert_eq!(report.issues[0].key, "CWE-2");
    }

    #[test]
    fn test_structural_errors_are_fatal() {
        assert!(matches!(
            Collection::<Cwe>::from_json_str("{not json"),
            Err(TaxonomyError::Json { .. })
        ));
        assert!(matches!(
            Collection::<Cwe>::from_json_str(r#"{"Capecs": {}}"#),
            Err(TaxonomyError::MissingCollection { key: "CWEs", .. })
        ));
    }
}
