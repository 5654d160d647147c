mod error;
mod file;
mod memory;

pub use error::OutputError;
pub use file::FileGraphSink;
pub use memory::MemoryGraphSink;

use crate::graph::NodeLinkGraph;

/// Destination for rendered graph documents.
///
/// Implementations decide where a named document ends up (a file per graph,
/// an in-memory map, ...). Names are record IDs or `<TAXONOMY>-FULL`.
pub trait GraphSink {
    /// Stores a document under `name`, replacing any previous one.
    fn write_graph(&mut self, name: &str, graph: &NodeLinkGraph) -> Result<(), OutputError>;
}

/// Checks that a document name is safe to use as a file stem.
pub fn validate_name(name: &str) -> Result<(), OutputError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(OutputError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("CWE-79").is_ok());
        assert!(validate_name("CAPEC-FULL").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("../etc/passwd").is_err());
        assert!(validate_name("CWE 79").is_err());
    }
}
