//! Access to the generated graph documents on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use secviz_core::Taxonomy;

use super::models::GraphEntry;

/// Checks a requested document name, accepting only `[A-Za-z0-9._-]`.
///
/// A trailing `.json` is tolerated and stripped.
pub fn sanitize_name(name: &str) -> Option<&str> {
    let name = name.strip_suffix(".json").unwrap_or(name);
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    valid.then_some(name)
}

/// Taxonomy a document belongs to, judged by its name prefix.
pub fn taxonomy_of(name: &str) -> Option<Taxonomy> {
    [Taxonomy::Cwe, Taxonomy::Capec]
        .into_iter()
        .find(|t| name.starts_with(t.id_prefix()))
}

/// Lists `*.json` documents in `graph_dir`.
///
/// Full graphs come first, then the rest ordered by taxonomy and numeric ID.
/// A missing directory lists as empty.
pub fn list_graphs(graph_dir: &Path) -> io::Result<Vec<GraphEntry>> {
    let read_dir = match fs::read_dir(graph_dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if sanitize_name(name).is_none() {
            continue;
        }

        let taxonomy = taxonomy_of(name);
        entries.push(GraphEntry {
            name: name.to_string(),
            taxonomy: taxonomy.map(|t| t.as_str().to_string()),
            full: taxonomy.is_some_and(|t| name == t.full_graph_name()),
            bytes: entry.metadata()?.len(),
        });
    }

    entries.sort_by_key(sort_key);
    Ok(entries)
}

fn sort_key(entry: &GraphEntry) -> (bool, Option<String>, u64, String) {
    let number = entry
        .name
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(u64::MAX);
    (!entry.full, entry.taxonomy.clone(), number, entry.name.clone())
}

/// Path of a named document inside `graph_dir`, if the name is acceptable.
pub fn graph_path(graph_dir: &Path, name: &str) -> Option<PathBuf> {
    sanitize_name(name).map(|name| graph_dir.join(format!("{}.json", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("CWE-79"), Some("CWE-79"));
        assert_eq!(sanitize_name("CAPEC-FULL.json"), Some("CAPEC-FULL"));
        assert_eq!(sanitize_name("../secret"), None);
        assert_eq!(sanitize_name("a/b"), None);
        assert_eq!(sanitize_name(""), None);
        assert_eq!(sanitize_name(".hidden"), None);
    }

    #[test]
    fn test_list_graphs_orders_full_first() {
        let dir = TempDir::new().unwrap();
        for name in ["CWE-284", "CWE-1000", "CWE-FULL", "CAPEC-152", "notes"] {
            fs::write(dir.path().join(format!("{}.json", name)), "{}").unwrap();
        }
        fs::write(dir.path().join("README.md"), "x").unwrap();

        let names: Vec<String> = list_graphs(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["CWE-FULL", "notes", "CAPEC-152", "CWE-284", "CWE-1000"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(list_graphs(&dir.path().join("absent")).unwrap().is_empty());
    }
}
