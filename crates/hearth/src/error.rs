//! # Hearth Error Types
//!
//! Wraps the core crates' errors and adds config and attribute failures.

use std::path::PathBuf;

use hearth_microblock::MicroBlockError;
use hearth_smithing::SmithingError;
use thiserror::Error;

/// Errors surfaced to the host.
#[derive(Error, Debug)]
pub enum HearthError {
    /// Chiseled block operation failed.
    #[error(transparent)]
    MicroBlock(#[from] MicroBlockError),

    /// Anvil or recipe operation failed.
    #[error(transparent)]
    Smithing(#[from] SmithingError),

    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::HearthConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chisel size not enabled in the config.
    #[error("chisel size {0} is not allowed")]
    ChiselSizeNotAllowed(u8),

    /// Stored attribute missing or of the wrong type.
    #[error("attribute {key}: expected {expected}")]
    Attribute {
        /// Attribute key.
        key: String,
        /// Expected type.
        expected: &'static str,
    },
}

/// Result type for host-facing operations.
pub type HearthResult<T> = Result<T, HearthError>;
