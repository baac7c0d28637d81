// In: src/error.rs

//! This module defines the single, unified error type for the entire svdpress library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvdPressError {
    // =========================================================================
    // === Pipeline Errors (surfaced by the orchestrator)
    // =========================================================================
    /// The source file is missing, corrupt, or not decodable.
    #[error("Failed to load image '{}': {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// The decoded image has a channel layout other than 1 or 3 channels.
    #[error("Unsupported image format: {channels} channel(s), expected 1 (grayscale) or 3 (RGB)")]
    UnsupportedFormat { channels: u8 },

    /// A codec failed while encoding the reconstructed buffer.
    #[error("Encoding to {format} failed: {reason}")]
    Encode { format: String, reason: String },

    // =========================================================================
    // === Input & Configuration Errors
    // =========================================================================
    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input file refused by upload acceptance (type not allowed, unusable name).
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    // =========================================================================
    // === Numeric Kernel Errors
    // =========================================================================
    #[error("Singular value decomposition failed: {0}")]
    Decomposition(String),

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while reading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl SvdPressError {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SvdPressError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(format: impl ToString, reason: impl ToString) -> Self {
        SvdPressError::Encode {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SvdPressError>;
