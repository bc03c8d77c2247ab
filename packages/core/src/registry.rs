use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConverterError, Result};

/// One installed converter as recorded in `registry.json`.
///
/// Unknown extra fields on a persisted entry are accepted on read and
/// dropped on the next save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub name: String,
    /// Source repository URL the converter was installed from.
    pub github: String,
    /// RFC 3339 installation timestamp.
    pub installed_at: String,
}

/// The persisted registry document: an ordered sequence of entries.
/// The registry records what *should* be installed; dispatch goes
/// through the in-memory index instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    pub converters: Vec<RegistryEntry>,
}

impl Registry {
    pub fn contains(&self, name: &str) -> bool {
        self.converters.iter().any(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.converters.iter().position(|c| c.name == name)
    }
}

/// Durable storage for the registry document.
///
/// Saves are full-document overwrites; callers hold exclusive access
/// for the duration of a mutation.
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry, creating an empty schema-valid document on
    /// disk if none exists. A malformed document is a `CorruptRegistry`
    /// error, never silently discarded.
    pub fn load(&self) -> Result<Registry> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let empty = Registry::default();
            self.save(&empty)?;
            return Ok(empty);
        }

        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|source| ConverterError::CorruptRegistry {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the document on disk.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let content = serde_json::to_string_pretty(registry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> RegistryStore {
        RegistryStore::new(dir.join("converters").join("registry.json"))
    }

    #[test]
    fn test_load_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let registry = store.load().unwrap();
        assert!(registry.converters.is_empty());
        assert!(store.path().exists());

        let on_disk = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(value["converters"], serde_json::json!([]));
    }

    #[test]
    fn test_save_load_roundtrip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let registry = Registry {
            converters: vec![
                RegistryEntry {
                    name: "json2yaml".to_string(),
                    github: "https://example.com/org/json2yaml".to_string(),
                    installed_at: "2026-01-01T00:00:00Z".to_string(),
                },
                RegistryEntry {
                    name: "csv2json".to_string(),
                    github: "https://example.com/org/csv2json".to_string(),
                    installed_at: "2026-01-02T00:00:00Z".to_string(),
                },
            ],
        };
        store.save(&registry).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, registry);
    }

    #[test]
    fn test_malformed_document_is_corrupt_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        match store.load() {
            Err(ConverterError::CorruptRegistry { path, .. }) => {
                assert_eq!(path, store.path());
            }
            other => panic!("expected CorruptRegistry, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_entry_fields_are_tolerated_and_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{"converters":[{"name":"x","github":"https://example.com/x","installedAt":"2026-01-01T00:00:00Z","stars":42}]}"#,
        )
        .unwrap();

        let registry = store.load().unwrap();
        assert_eq!(registry.converters.len(), 1);

        store.save(&registry).unwrap();
        let on_disk = fs::read_to_string(store.path()).unwrap();
        assert!(!on_disk.contains("stars"));
        assert!(on_disk.contains("installedAt"));
    }
}
