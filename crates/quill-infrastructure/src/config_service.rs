//! Configuration service.
//!
//! Loads `QuillConfig` from `config.toml` (see [`QuillPaths`]) and caches it
//! so repeated action runs do not hit the file system.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use quill_core::QuillConfig;
use quill_core::error::Result;

use crate::paths::QuillPaths;
use crate::storage::AtomicTomlFile;

/// Loads, validates, caches and saves the Quill configuration file.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<QuillConfig>>,
    /// Cached configuration. `None` until first access or after invalidation.
    config: Arc<RwLock<Option<QuillConfig>>>,
}

impl ConfigService {
    /// Creates a service for the platform config file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(QuillPaths::config_file()?))
    }

    /// Creates a service for an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &Path {
        self.file.path()
    }

    /// Returns the configuration, loading it from disk if not cached.
    ///
    /// A missing or empty file yields the defaults. A file that fails to
    /// parse or validate is an error and is not cached.
    pub fn get_config(&self) -> Result<QuillConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = match self.file.load()? {
            Some(config) => config,
            None => {
                tracing::debug!(path = %self.config_path().display(), "no config file, using defaults");
                QuillConfig::default()
            }
        };
        loaded.validate()?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Validates and writes `config`, then refreshes the cache.
    pub fn save_config(&self, config: &QuillConfig) -> Result<()> {
        config.validate()?;
        self.file.save(config)?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        tracing::info!(path = %self.config_path().display(), "configuration saved");
        Ok(())
    }

    /// Writes the default configuration.
    ///
    /// An existing file is left alone unless `force` is set. Returns whether
    /// the file was written.
    pub fn init(&self, force: bool) -> Result<bool> {
        if self.config_path().exists() && !force {
            tracing::debug!(path = %self.config_path().display(), "config file exists, not overwriting");
            return Ok(false);
        }

        self.save_config(&QuillConfig::default())?;
        Ok(true)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
