//! Converter lifecycle and dispatch engine for `fc`.
//!
//! Converters are independently-sourced plugins installed from git
//! repositories. This crate installs, validates, persists, loads and
//! indexes them, and resolves a `(source_format, target_format)` pair
//! to exactly one executable converter at conversion time. The CLI in
//! `apps/cli` is a thin command layer over [`manager::ConverterManager`].

pub mod config;
pub mod descriptor;
pub mod error;
pub mod installer;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod toolchain;

pub use config::Config;
pub use descriptor::ConverterDescriptor;
pub use error::{ConverterError, Result};
pub use manager::ConverterManager;
