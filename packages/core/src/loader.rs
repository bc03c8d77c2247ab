//! Turns a converter's on-disk build artifact into a validated
//! [`ConverterDescriptor`].
//!
//! The conventional build output is `dist/converter.json` inside the
//! converter directory, declaring the converter's name, formats and the
//! entry-point executable its build produced.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::descriptor::{ConverterDescriptor, ConverterOption};
use crate::error::{ConverterError, Result};

/// Conventional build-output directory inside a converter directory.
pub const ARTIFACT_DIR: &str = "dist";
/// Manifest file a converter's build step must emit under [`ARTIFACT_DIR`].
pub const MANIFEST_FILE: &str = "converter.json";

/// Raw manifest shape before validation. Every field defaults so that
/// shape violations surface as named constraints instead of parse errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateManifest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    source_formats: Vec<String>,
    #[serde(default)]
    target_formats: Vec<String>,
    #[serde(default)]
    entry: String,
    #[serde(default)]
    options: BTreeMap<String, ConverterOption>,
}

/// Materialize the build artifact under `converter_dir` into a descriptor.
///
/// The returned descriptor is keyed by the manifest's self-declared
/// `name`, which may legitimately differ from the directory name used
/// to locate it.
pub fn load(converter_dir: &Path) -> Result<ConverterDescriptor> {
    let artifact_dir = converter_dir.join(ARTIFACT_DIR);
    let manifest_path = artifact_dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(ConverterError::ArtifactMissing {
            path: manifest_path,
        });
    }

    let text = fs::read_to_string(&manifest_path)?;
    let candidate: CandidateManifest =
        serde_json::from_str(&text).map_err(|e| ConverterError::SchemaInvalid {
            constraint: format!("manifest is not valid JSON: {e}"),
        })?;

    if candidate.name.trim().is_empty() {
        return Err(ConverterError::SchemaInvalid {
            constraint: "name must be a non-empty string".to_string(),
        });
    }
    if candidate.source_formats.is_empty() {
        return Err(ConverterError::SchemaInvalid {
            constraint: "sourceFormats must not be empty".to_string(),
        });
    }
    if candidate.target_formats.is_empty() {
        return Err(ConverterError::SchemaInvalid {
            constraint: "targetFormats must not be empty".to_string(),
        });
    }
    if candidate.entry.trim().is_empty() {
        return Err(ConverterError::SchemaInvalid {
            constraint: "entry must name the built executable".to_string(),
        });
    }

    let entry = artifact_dir.join(&candidate.entry);
    if !entry.is_file() {
        return Err(ConverterError::SchemaInvalid {
            constraint: format!(
                "entry \"{}\" does not exist under {}",
                candidate.entry,
                artifact_dir.display()
            ),
        });
    }

    Ok(ConverterDescriptor {
        name: candidate.name,
        description: candidate.description,
        source_formats: candidate.source_formats,
        target_formats: candidate.target_formats,
        entry,
        options: candidate.options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifact(dir: &Path, manifest: &str, entry: Option<&str>) {
        let dist = dir.join(ARTIFACT_DIR);
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join(MANIFEST_FILE), manifest).unwrap();
        if let Some(entry) = entry {
            fs::write(dist.join(entry), "#!/bin/sh\n").unwrap();
        }
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        match load(dir.path()) {
            Err(ConverterError::ArtifactMissing { path }) => {
                assert!(path.ends_with("dist/converter.json"));
            }
            other => panic!("expected ArtifactMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_manifest_loads() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            r#"{
                "name": "json2yaml",
                "description": "JSON to YAML",
                "sourceFormats": ["json"],
                "targetFormats": ["yaml"],
                "entry": "convert.sh",
                "options": {
                    "indent": { "description": "spaces per level", "required": false, "default": 2 }
                }
            }"#,
            Some("convert.sh"),
        );

        let descriptor = load(dir.path()).unwrap();
        assert_eq!(descriptor.name, "json2yaml");
        assert_eq!(descriptor.source_formats, vec!["json"]);
        assert_eq!(descriptor.target_formats, vec!["yaml"]);
        assert!(descriptor.entry.is_file());
        assert!(descriptor.options.contains_key("indent"));
    }

    #[test]
    fn test_self_declared_name_wins_over_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let converter_dir = dir.path().join("some-repo-name");
        fs::create_dir_all(&converter_dir).unwrap();
        write_artifact(
            &converter_dir,
            r#"{"name":"totally-different","sourceFormats":["a"],"targetFormats":["b"],"entry":"run"}"#,
            Some("run"),
        );

        let descriptor = load(&converter_dir).unwrap();
        assert_eq!(descriptor.name, "totally-different");
    }

    #[test]
    fn test_schema_violations_name_the_constraint() {
        let cases = [
            (
                r#"{"sourceFormats":["a"],"targetFormats":["b"],"entry":"run"}"#,
                "name",
            ),
            (
                r#"{"name":"x","sourceFormats":[],"targetFormats":["b"],"entry":"run"}"#,
                "sourceFormats",
            ),
            (
                r#"{"name":"x","sourceFormats":["a"],"targetFormats":[],"entry":"run"}"#,
                "targetFormats",
            ),
            (
                r#"{"name":"x","sourceFormats":["a"],"targetFormats":["b"]}"#,
                "entry",
            ),
        ];

        for (manifest, expected) in cases {
            let dir = tempfile::tempdir().unwrap();
            write_artifact(dir.path(), manifest, Some("run"));
            match load(dir.path()) {
                Err(ConverterError::SchemaInvalid { constraint }) => {
                    assert!(
                        constraint.contains(expected),
                        "constraint {constraint:?} should mention {expected}"
                    );
                }
                other => panic!("expected SchemaInvalid for {manifest}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_entry_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(
            dir.path(),
            r#"{"name":"x","sourceFormats":["a"],"targetFormats":["b"],"entry":"gone"}"#,
            None,
        );
        match load(dir.path()) {
            Err(ConverterError::SchemaInvalid { constraint }) => {
                assert!(constraint.contains("gone"));
            }
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_schema_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "not json at all", None);
        assert!(matches!(
            load(dir.path()),
            Err(ConverterError::SchemaInvalid { .. })
        ));
    }
}
