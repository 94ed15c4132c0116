//! Thread-safe configuration storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::ClientConfig;

/// Thread-safe config container with interior mutability.
///
/// Screens read it whenever they build image descriptors, so a reload is
/// picked up by the next descriptor without rebuilding anything.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<ClientConfig>>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(config: ClientConfig, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> ClientConfig {
        self.inner.read().clone()
    }

    /// Reload config from the file.
    ///
    /// On failure, keeps the old config and returns the error.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = ClientConfig::load_from(&self.path)?;
        *self.inner.write() = config;
        tracing::info!(path = %self.path.display(), "configuration reloaded");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").field("path", &self.path).finish()
    }
}
