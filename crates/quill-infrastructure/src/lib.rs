//! File-system backed services for Quill: config paths, atomic TOML storage
//! and the cached configuration service.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::{PathError, QuillPaths};
