use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConverterError>;

/// Everything that can go wrong across the converter lifecycle.
///
/// Install pipeline failures collapse the underlying cause into one
/// kind per stage; the detail is preserved in the message so debug
/// output stays useful.
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry at {path} is corrupt: {source}")]
    CorruptRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to clone {url}: {detail}")]
    FetchFailed { url: String, detail: String },

    #[error("dependency resolution failed in {dir}: {detail}")]
    DependencyResolutionFailed { dir: PathBuf, detail: String },

    #[error("build failed in {dir}: {detail}")]
    BuildFailed { dir: PathBuf, detail: String },

    #[error("no build artifact found at {path}")]
    ArtifactMissing { path: PathBuf },

    #[error("converter manifest is invalid: {constraint}")]
    SchemaInvalid { constraint: String },

    #[error("converter \"{name}\" is already installed")]
    AlreadyInstalled { name: String },

    #[error("converter \"{name}\" not found")]
    NotFound { name: String },
}
