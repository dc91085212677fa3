use std::path::PathBuf;
use thiserror::Error;

use crate::core::BindError;

/// Errors that can occur while loading or applying a bind profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Profile file does not exist.
    #[error("Profile not found: {0}")]
    NotFound(PathBuf),
    /// Profile is not valid JSON or does not match the expected shape.
    #[error("Invalid profile: {0}")]
    Parse(#[from] serde_json::Error),
    /// A group's bind data was rejected; the group was left unchanged.
    #[error("Group '{group}': {source}")]
    Group { group: String, source: BindError },
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
