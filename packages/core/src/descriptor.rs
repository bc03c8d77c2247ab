use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single option a converter declares it accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterOption {
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Validated in-memory representation of an installed converter.
///
/// The `name` is the converter's self-declared identifier and is
/// authoritative for dispatch; it may differ from the directory the
/// converter was installed into.
#[derive(Debug, Clone)]
pub struct ConverterDescriptor {
    pub name: String,
    pub description: String,
    /// Lower-cased file-extension tags this converter reads.
    pub source_formats: Vec<String>,
    /// Lower-cased file-extension tags this converter writes.
    pub target_formats: Vec<String>,
    /// Absolute path to the built entry-point executable.
    pub entry: PathBuf,
    /// Options declared by the converter, keyed by flag name.
    pub options: BTreeMap<String, ConverterOption>,
}

impl ConverterDescriptor {
    /// True if this converter claims the given format pair.
    /// Comparison is exact-string; callers normalize case beforehand.
    pub fn handles(&self, source_format: &str, target_format: &str) -> bool {
        self.source_formats.iter().any(|f| f == source_format)
            && self.target_formats.iter().any(|f| f == target_format)
    }

    /// Invoke the converter on `input`/`output` with the given options.
    ///
    /// The entry point is called as `<entry> <input> <output> [--key value ...]`
    /// and its exit status decides success. A spawn failure is an error;
    /// a non-zero exit is an unsuccessful conversion, not an error.
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        options: &BTreeMap<String, String>,
    ) -> Result<bool> {
        let mut cmd = Command::new(&self.entry);
        cmd.arg(input).arg(output);
        for (key, value) in options {
            cmd.arg(format!("--{key}")).arg(value);
        }

        tracing::debug!(converter = %self.name, entry = %self.entry.display(), "invoking converter");
        let status = cmd.status()?;
        Ok(status.success())
    }
}
