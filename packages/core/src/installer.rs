//! Installs one converter from one source repository URL.
//!
//! The pipeline is strictly sequential: fetch, resolve dependencies,
//! build, then load and validate. Each stage gates the next and no
//! stage is retried. A failed install may leave a partially-built
//! directory behind; that residue is reclaimed on the next install of
//! the same source (the derived directory is force-cleaned when it has
//! no registry entry).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::descriptor::ConverterDescriptor;
use crate::error::{ConverterError, Result};
use crate::loader;
use crate::registry::Registry;
use crate::toolchain;

/// Executes the external stages of an install. The production
/// implementation shells out; tests substitute their own so the
/// pipeline can run without network access or toolchains installed.
pub trait StageExecutor: Send + Sync {
    /// Clone `url` into `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> std::result::Result<(), String>;

    /// Run one toolchain command inside `dir`.
    fn run(&self, argv: &[String], dir: &Path) -> std::result::Result<(), String>;
}

/// Default executor: `git clone` plus the detected toolchain commands.
pub struct ShellExecutor;

impl StageExecutor for ShellExecutor {
    fn fetch(&self, url: &str, dest: &Path) -> std::result::Result<(), String> {
        let output = Command::new("git")
            .arg("clone")
            .arg(url)
            .arg(dest)
            .output()
            .map_err(|e| format!("failed to spawn git: {e}"))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(diagnostic(&output.stderr, output.status.code()))
        }
    }

    fn run(&self, argv: &[String], dir: &Path) -> std::result::Result<(), String> {
        let (program, args) = argv.split_first().ok_or("empty command")?;
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| format!("failed to spawn {program}: {e}"))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(diagnostic(&output.stderr, output.status.code()))
        }
    }
}

fn diagnostic(stderr: &[u8], code: Option<i32>) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.is_empty() {
        match code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Orchestrates fetch -> resolve -> build -> validate for one converter.
pub struct Installer {
    converters_dir: PathBuf,
    executor: Box<dyn StageExecutor>,
}

impl Installer {
    pub fn new(converters_dir: impl Into<PathBuf>) -> Self {
        Self::with_executor(converters_dir, Box::new(ShellExecutor))
    }

    pub fn with_executor(converters_dir: impl Into<PathBuf>, executor: Box<dyn StageExecutor>) -> Self {
        Self {
            converters_dir: converters_dir.into(),
            executor,
        }
    }

    /// Derive the working-directory name from the last path segment of
    /// a source URL, stripping a trailing `.git`.
    pub fn derive_name(source_url: &str) -> String {
        source_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("")
            .trim_end_matches(".git")
            .to_string()
    }

    /// Run the full pipeline to completion. The registry is only read
    /// here; the manager mutates it after the pipeline has succeeded.
    pub fn install(&self, source_url: &str, registry: &Registry) -> Result<ConverterDescriptor> {
        let derived = Self::derive_name(source_url);
        if derived.is_empty() {
            return Err(ConverterError::FetchFailed {
                url: source_url.to_string(),
                detail: "could not derive a directory name from the URL".to_string(),
            });
        }

        if registry.contains(&derived) {
            return Err(ConverterError::AlreadyInstalled { name: derived });
        }

        let dir = self.converters_dir.join(&derived);

        // Residue from a previous failed install has no registry entry;
        // start from a clean clone rather than reusing it.
        if dir.exists() {
            tracing::warn!(dir = %dir.display(), "removing leftover directory from a previous install");
            fs::remove_dir_all(&dir)?;
        }

        tracing::info!(url = source_url, "cloning converter repository");
        self.executor
            .fetch(source_url, &dir)
            .map_err(|detail| ConverterError::FetchFailed {
                url: source_url.to_string(),
                detail,
            })?;

        let tc = toolchain::detect(&dir).ok_or_else(|| ConverterError::DependencyResolutionFailed {
            dir: dir.clone(),
            detail: "no supported toolchain (package.json, Cargo.toml or Makefile) in clone"
                .to_string(),
        })?;
        tracing::debug!(toolchain = tc.name, "detected toolchain");

        if let Some(resolve) = &tc.resolve {
            self.executor.run(resolve, &dir).map_err(|detail| {
                ConverterError::DependencyResolutionFailed {
                    dir: dir.clone(),
                    detail,
                }
            })?;
        }

        self.executor
            .run(&tc.build, &dir)
            .map_err(|detail| ConverterError::BuildFailed {
                dir: dir.clone(),
                detail,
            })?;

        loader::load(&dir)
    }
}
