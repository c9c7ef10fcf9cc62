//! Error types for the converter.
//!
//! Fatal errors ([`ConverterError`]) abort a batch before any file is touched.
//! Per-file errors ([`ConversionError`]) are folded into the file's
//! [`ConversionResult`](crate::core::ConversionResult) and never escalate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Batch-fatal errors, surfaced to the invoking context as a single terminal error.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Source root is missing or unreadable
    #[error("Source directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Source root exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Destination directory could not be created
    #[error("Cannot create output directory {}: {reason}", .path.display())]
    DirectoryCreate { path: PathBuf, reason: String },

    /// Operation not allowed in the job's current state
    #[error("Invalid job state: {0}")]
    InvalidState(String),

    /// Background task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience result type for fatal converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn directory_create(path: impl Into<PathBuf>, err: impl ToString) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn task<T: Into<String>>(msg: T) -> Self {
        Self::Task(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }
}

/// Per-file conversion errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConversionError {
    /// Source could not be read or decoded (corrupt file, unsupported codec variant)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Pixel data could not be encoded or the destination could not be written
    #[error("Encode error: {0}")]
    Encode(String),
}

impl ConversionError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }
}

/// Best-effort source removal failed after a successful conversion.
///
/// Only ever logged; it does not change success accounting.
#[derive(Error, Debug, Serialize)]
#[error("Could not delete source {}: {reason}", .path.display())]
pub struct DeleteWarning {
    pub path: PathBuf,
    pub reason: String,
}

impl DeleteWarning {
    pub fn new(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
