// Lexical-Sense Lookup
// External collaborator for the verb-sense-ambiguity feature: a lemma maps
// to its count of distinct dictionary senses. Only the trait is visible to
// the feature engine; the JSON-backed inventory is one concrete source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub trait SenseInventory: Send + Sync {
    /// Distinct sense count for a lemma; 0 for unknown words.
    fn sense_count(&self, lemma: &str) -> usize;
}

#[derive(Debug, Error)]
pub enum SenseError {
    #[error("failed to read sense inventory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse sense inventory {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sense counts loaded from a JSON object of lemma -> count, typically an
/// export of a WordNet-style resource.
pub struct JsonSenseInventory {
    counts: HashMap<String, usize>,
}

impl JsonSenseInventory {
    pub fn from_file(path: &Path) -> Result<Self, SenseError> {
        let content = std::fs::read_to_string(path).map_err(|source| SenseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| SenseError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Raw(HashMap<String, usize>);

        let Raw(raw) = serde_json::from_str(content)?;
        let counts: HashMap<String, usize> = raw
            .into_iter()
            .map(|(lemma, n)| (lemma.to_lowercase(), n))
            .collect();
        info!(lemmas = counts.len(), "sense inventory loaded");
        Ok(Self { counts })
    }
}

impl SenseInventory for JsonSenseInventory {
    fn sense_count(&self, lemma: &str) -> usize {
        self.counts
            .get(&lemma.to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_inventory_lookup() {
        let inv = JsonSenseInventory::from_json(r#"{"run": 41, "See": 25}"#).unwrap();
        assert_eq!(inv.sense_count("run"), 41);
        // Case-insensitive on both sides.
        assert_eq!(inv.sense_count("see"), 25);
        assert_eq!(inv.sense_count("SEE"), 25);
        assert_eq!(inv.sense_count("flummox"), 0);
    }

    #[test]
    fn test_json_inventory_rejects_malformed_input() {
        assert!(JsonSenseInventory::from_json("[1, 2]").is_err());
    }
}
