//! The façade combining store, loader and installer.
//!
//! The manager exclusively owns the registry document and the
//! in-memory index for its process lifetime. Mutations take the write
//! lock for their whole read-modify-write span, so at most one is in
//! flight at a time; lookups and listings are reads and may run
//! concurrently against a consistent snapshot.

use std::fs;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::descriptor::ConverterDescriptor;
use crate::error::{ConverterError, Result};
use crate::installer::Installer;
use crate::loader;
use crate::registry::{Registry, RegistryEntry, RegistryStore};

/// One row of [`ConverterManager::list_converters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterListing {
    pub name: String,
    pub description: String,
    /// Full cross-product of source x target formats, as "src -> dst".
    pub formats: Vec<String>,
}

/// Insertion-ordered mapping from converter name to descriptor.
///
/// Dispatch and listing both iterate in insertion order, which is what
/// makes the "first match wins" rule deterministic.
#[derive(Debug, Default)]
struct ConverterIndex {
    entries: Vec<ConverterDescriptor>,
}

impl ConverterIndex {
    /// Insert keyed by the descriptor's self-declared name. Replacing
    /// an existing name keeps its position.
    fn insert(&mut self, descriptor: ConverterDescriptor) {
        match self.entries.iter_mut().find(|d| d.name == descriptor.name) {
            Some(slot) => *slot = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    fn remove(&mut self, name: &str) {
        self.entries.retain(|d| d.name != name);
    }

    fn iter(&self) -> impl Iterator<Item = &ConverterDescriptor> {
        self.entries.iter()
    }
}

#[derive(Default)]
struct ManagerState {
    registry: Registry,
    index: ConverterIndex,
}

/// Public operations over the converter lifecycle: initialize, add,
/// remove, list and resolve.
pub struct ConverterManager {
    config: Config,
    store: RegistryStore,
    installer: Installer,
    state: RwLock<ManagerState>,
}

impl ConverterManager {
    pub fn new(config: Config) -> Self {
        let installer = Installer::new(config.converters_dir());
        Self::with_installer(config, installer)
    }

    /// Construct with a custom installer (used to substitute the
    /// external-stage executor).
    pub fn with_installer(config: Config, installer: Installer) -> Self {
        let store = RegistryStore::new(config.registry_path());
        Self {
            config,
            store,
            installer,
            state: RwLock::new(ManagerState::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ensure the on-disk structure exists, load the registry and
    /// materialize every registered converter into the index.
    ///
    /// Converters whose artifact cannot be loaded are logged and
    /// skipped; the process continues with a partial index. Store
    /// failures are unrecoverable and returned to the caller.
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(self.config.converters_dir())?;
        let registry = self.store.load()?;

        let mut index = ConverterIndex::default();
        for entry in &registry.converters {
            let dir = self.config.converters_dir().join(&entry.name);
            match loader::load(&dir) {
                Ok(descriptor) => {
                    tracing::info!(converter = %descriptor.name, "loaded converter");
                    index.insert(descriptor);
                }
                Err(err) => {
                    tracing::warn!(converter = %entry.name, error = %err, "skipping converter that failed to load");
                }
            }
        }

        let mut state = self.state.write().await;
        state.registry = registry;
        state.index = index;
        Ok(())
    }

    /// Install a converter from a source repository URL and register it.
    ///
    /// The full install pipeline runs to completion before any registry
    /// mutation. The registry is persisted before the index is updated,
    /// so the index never contains an entry absent from durable storage.
    pub async fn add_converter(&self, source_url: &str) -> Result<ConverterDescriptor> {
        let mut state = self.state.write().await;

        let descriptor = self.installer.install(source_url, &state.registry)?;

        state.registry.converters.push(RegistryEntry {
            name: Installer::derive_name(source_url),
            github: source_url.to_string(),
            installed_at: chrono::Utc::now().to_rfc3339(),
        });
        if let Err(err) = self.store.save(&state.registry) {
            // Keep the in-memory document consistent with disk so a
            // retry is not spuriously rejected as AlreadyInstalled.
            state.registry.converters.pop();
            return Err(err);
        }

        state.index.insert(descriptor.clone());
        tracing::info!(converter = %descriptor.name, url = source_url, "added converter");
        Ok(descriptor)
    }

    /// Unregister a converter by its registry name and best-effort
    /// delete its installation directory.
    pub async fn remove_converter(&self, name: &str) -> Result<()> {
        let mut state = self.state.write().await;

        let Some(pos) = state.registry.position(name) else {
            return Err(ConverterError::NotFound {
                name: name.to_string(),
            });
        };

        let removed = state.registry.converters.remove(pos);
        if let Err(err) = self.store.save(&state.registry) {
            state.registry.converters.insert(pos, removed);
            return Err(err);
        }

        state.index.remove(name);

        // Registry and index are already consistent; directory deletion
        // failure is logged, not fatal.
        let dir = self.config.converters_dir().join(name);
        if dir.exists() {
            if let Err(err) = fs::remove_dir_all(&dir) {
                tracing::warn!(converter = name, error = %err, "failed to delete installation directory");
            }
        }

        tracing::info!(converter = name, "removed converter");
        Ok(())
    }

    /// Derived view over the index, in insertion order.
    pub async fn list_converters(&self) -> Vec<ConverterListing> {
        let state = self.state.read().await;
        state
            .index
            .iter()
            .map(|d| ConverterListing {
                name: d.name.clone(),
                description: d.description.clone(),
                formats: d
                    .source_formats
                    .iter()
                    .flat_map(|src| {
                        d.target_formats
                            .iter()
                            .map(move |target| format!("{src} -> {target}"))
                    })
                    .collect(),
            })
            .collect()
    }

    /// Resolve a format pair to the first converter (in index order)
    /// claiming both formats. Comparison is exact-string; callers
    /// lower-case the tags before lookup.
    pub async fn get_converter(
        &self,
        source_format: &str,
        target_format: &str,
    ) -> Option<ConverterDescriptor> {
        let state = self.state.read().await;
        let found = state
            .index
            .iter()
            .find(|d| d.handles(source_format, target_format))
            .cloned();
        found
    }
}
