//! Detects the build toolchain of a cloned converter repository.
//!
//! Each stage is an opaque external command; the converter's build is
//! expected to produce the `dist/` artifact the loader consumes.

use std::path::Path;

/// Commands for the two shelled-out stages of an install.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub name: &'static str,
    /// Dependency-install step; `None` when the toolchain has no
    /// separate resolve stage.
    pub resolve: Option<Vec<String>>,
    /// Build step.
    pub build: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Detect which toolchain can handle the project at `dir`.
/// Priority order matters if a project could match multiple.
pub fn detect(dir: &Path) -> Option<Toolchain> {
    if dir.join("package.json").is_file() {
        return Some(Toolchain {
            name: "npm",
            resolve: Some(argv(&["npm", "install"])),
            build: argv(&["npm", "run", "build"]),
        });
    }

    if dir.join("Cargo.toml").is_file() {
        return Some(Toolchain {
            name: "cargo",
            resolve: Some(argv(&["cargo", "fetch"])),
            build: argv(&["cargo", "build", "--release"]),
        });
    }

    if dir.join("Makefile").is_file() {
        return Some(Toolchain {
            name: "make",
            resolve: None,
            build: argv(&["make"]),
        });
    }

    None
}
