use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment variable overriding the base directory.
pub const BASE_DIR_ENV: &str = "FC_BASE_DIR";
/// Environment variable enabling verbose error detail.
pub const DEBUG_ENV: &str = "FC_DEBUG";

/// Explicit configuration for a [`crate::manager::ConverterManager`].
///
/// The only recognized knobs are the base directory and the debug flag;
/// neither affects lifecycle control flow.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub debug: bool,
}

impl Config {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            debug: false,
        }
    }

    /// Build a config from the environment: `FC_BASE_DIR` if set,
    /// otherwise `$HOME/.fc`.
    pub fn from_env() -> Result<Self> {
        let base_dir = match std::env::var_os(BASE_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, "could not determine home directory")
                })?
                .join(".fc"),
        };

        Ok(Self {
            base_dir,
            debug: std::env::var_os(DEBUG_ENV).is_some(),
        })
    }

    /// Directory holding one subdirectory per installed converter.
    pub fn converters_dir(&self) -> PathBuf {
        self.base_dir.join("converters")
    }

    /// Path of the persisted registry document.
    pub fn registry_path(&self) -> PathBuf {
        self.converters_dir().join("registry.json")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
