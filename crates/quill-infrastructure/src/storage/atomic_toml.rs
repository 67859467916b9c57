//! Atomic TOML file operations.
//!
//! Writes go to a sibling tmp file which is fsynced and renamed over the
//! target, so readers only ever see the old or the new content.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

use quill_core::QuillError;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid path {0}: no parent directory or file name")]
    InvalidPath(PathBuf),
}

impl From<AtomicTomlError> for QuillError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io { .. } | AtomicTomlError::InvalidPath(_) => {
                QuillError::io(err.to_string())
            }
            AtomicTomlError::Parse { .. } | AtomicTomlError::Serialize(_) => {
                QuillError::Serialization {
                    format: "TOML".to_string(),
                    message: err.to_string(),
                }
            }
        }
    }
}

/// A handle to a TOML file that is always replaced as a whole.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| self.io(source))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data = toml::from_str(&content).map_err(|source| AtomicTomlError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(data))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AtomicTomlError::InvalidPath(self.path.clone()))?;
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| self.io(source))?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path).map_err(|source| self.io(source))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|()| tmp_file.sync_all())
            .map_err(|source| self.io(source))?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).map_err(|source| self.io(source))?;

        tracing::debug!(path = %self.path.display(), "saved TOML file");
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicTomlError::InvalidPath(self.path.clone()))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }

    fn io(&self, source: std::io::Error) -> AtomicTomlError {
        AtomicTomlError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Sample>::new(temp_dir.path().join("sample.toml"));

        let sample = Sample {
            name: "quill".to_string(),
            count: 3,
        };
        file.save(&sample).unwrap();

        assert_eq!(file.load().unwrap(), Some(sample));
    }

    #[test]
    fn test_load_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        assert!(file.load().unwrap().is_none());

        fs::write(&path, "   \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "name = [unterminated").unwrap();

        let err = AtomicTomlFile::<Sample>::new(path).load().unwrap_err();

        assert!(matches!(err, AtomicTomlError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_tmp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.toml");
        let file = AtomicTomlFile::<Sample>::new(path.clone());

        file.save(&Sample {
            name: "a".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join(".sample.toml.tmp").exists());
    }
}
