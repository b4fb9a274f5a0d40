use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use super::normalize::normalize_region_name;

/// Synonym table shipped with the binary
const EMBEDDED_SYNONYMS: &str = include_str!("../../../../config/synonyms.json");

#[derive(Debug, Error)]
pub enum SynonymTableError {
    #[error("Failed to read synonym file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid synonym JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Alias '{alias}' maps to both '{first}' and '{second}'")]
    Ambiguous {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Synonym entry '{0}' normalizes to an empty name")]
    Empty(String),
}

/// Known aliases of region names, keyed by normalized form.
///
/// Loaded from a JSON object mapping a canonical name to its aliases:
///
/// ```json
/// { "surakarta": ["solo"], "jawa barat": ["west java", "jabar"] }
/// ```
///
/// Canonical names and aliases go through the same normalization as the
/// names being matched, so `"Kota Surakarta"` and `"solo"` meet.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    canonical_by_name: HashMap<String, String>,
}

impl SynonymTable {
    pub fn from_json(json: &str) -> Result<Self, SynonymTableError> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    pub fn from_entries<I, A>(entries: I) -> Result<Self, SynonymTableError>
    where
        I: IntoIterator<Item = (String, A)>,
        A: IntoIterator<Item = String>,
    {
        let mut table = Self::default();
        let mut pending = Vec::new();

        // Canonical names first so an alias colliding with one is caught
        for (canonical, aliases) in entries {
            let key = normalized_key(&canonical)?;
            table.insert(key.clone(), key.clone())?;
            pending.push((key, aliases));
        }

        for (canonical, aliases) in pending {
            for alias in aliases {
                let alias_key = normalized_key(&alias)?;
                table.insert(alias_key, canonical.clone())?;
            }
        }

        Ok(table)
    }

    /// The table compiled into the binary
    pub fn embedded() -> Result<Self, SynonymTableError> {
        Self::from_json(EMBEDDED_SYNONYMS)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SynonymTableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SynonymTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path` when given, otherwise fall back to the embedded table
    pub fn from_path_or_embedded(path: Option<&Path>) -> Result<Self, SynonymTableError> {
        match path {
            Some(path) => {
                tracing::info!("Loading region synonyms from {}", path.display());
                Self::load(path)
            }
            None => Self::embedded(),
        }
    }

    fn insert(&mut self, name: String, canonical: String) -> Result<(), SynonymTableError> {
        match self.canonical_by_name.get(&name) {
            Some(existing) if *existing != canonical => Err(SynonymTableError::Ambiguous {
                alias: name,
                first: existing.clone(),
                second: canonical,
            }),
            Some(_) => Ok(()),
            None => {
                self.canonical_by_name.insert(name, canonical);
                Ok(())
            }
        }
    }

    /// Canonical form of an already-normalized name, if the table knows it
    pub fn canonical(&self, normalized: &str) -> Option<&str> {
        self.canonical_by_name.get(normalized).map(String::as_str)
    }

    /// Whether two distinct normalized names are aliases of the same region
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        match (self.canonical(a), self.canonical(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.canonical_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_by_name.is_empty()
    }
}

fn normalized_key(raw: &str) -> Result<String, SynonymTableError> {
    let key = normalize_region_name(raw).base;
    if key.is_empty() {
        return Err(SynonymTableError::Empty(raw.to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_loads() {
        let table = SynonymTable::embedded().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.canonical("solo"), Some("surakarta"));
        assert_eq!(table.canonical("west java"), Some("jawa barat"));
    }

    #[test]
    fn test_keys_are_normalized() {
        let table = SynonymTable::from_json(r#"{"Kota Surakarta": ["SOLO", "Kota Solo"]}"#).unwrap();

        assert_eq!(table.canonical("surakarta"), Some("surakarta"));
        assert_eq!(table.canonical("solo"), Some("surakarta"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_are_synonyms() {
        let table = SynonymTable::embedded().unwrap();

        assert!(table.are_synonyms("jogja", "yogyakarta"));
        assert!(table.are_synonyms("jogja", "yogya"));
        assert!(table.are_synonyms("south jakarta", "jakarta selatan"));
        assert!(!table.are_synonyms("solo", "solo"));
        assert!(!table.are_synonyms("solo", "jakarta selatan"));
        assert!(!table.are_synonyms("solo", "unknown"));
    }

    #[test]
    fn test_ambiguous_alias_is_rejected() {
        let err = SynonymTable::from_json(r#"{"surakarta": ["solo"], "sukoharjo": ["solo"]}"#)
            .unwrap_err();
        assert!(matches!(err, SynonymTableError::Ambiguous { .. }));
    }

    #[test]
    fn test_alias_colliding_with_canonical_is_rejected() {
        let err = SynonymTable::from_json(r#"{"bogor": ["bekasi"], "bekasi": []}"#).unwrap_err();
        assert!(matches!(err, SynonymTableError::Ambiguous { .. }));
    }

    #[test]
    fn test_empty_alias_is_rejected() {
        let err = SynonymTable::from_json(r#"{"surakarta": ["  "]}"#).unwrap_err();
        assert!(matches!(err, SynonymTableError::Empty(_)));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = SynonymTable::from_json(r#"["solo"]"#).unwrap_err();
        assert!(matches!(err, SynonymTableError::Parse(_)));
    }

    #[test]
    fn test_no_path_uses_embedded_table() {
        let table = SynonymTable::from_path_or_embedded(None).unwrap();
        assert_eq!(table.len(), SynonymTable::embedded().unwrap().len());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SynonymTable::load("/nonexistent/synonyms.json").unwrap_err();
        assert!(matches!(err, SynonymTableError::Io { .. }));
    }
}
