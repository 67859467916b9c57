//! Path management for Quill configuration files.
//!
//! ```text
//! ~/.config/quill/        # Config directory (platform config dir + "quill")
//! └── config.toml         # Action settings and timings
//! ```

use std::path::PathBuf;
use thiserror::Error;

use quill_core::QuillError;

const APP_DIR: &str = "quill";
const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine the platform configuration directory")]
    ConfigDirNotFound,
}

impl From<PathError> for QuillError {
    fn from(err: PathError) -> Self {
        QuillError::config(err.to_string())
    }
}

pub struct QuillPaths;

impl QuillPaths {
    /// Returns the Quill configuration directory (e.g. `~/.config/quill/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
