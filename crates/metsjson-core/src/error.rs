//! Error types for METS conversion.
//!
//! Every condition here is fatal to the run: there is no partial manifest.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations.
pub type MetsResult<T> = Result<T, MetsError>;

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum MetsError {
    /// A required input was not supplied.
    #[error("usage: {message}")]
    Usage { message: String },

    /// The source document could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document is not UTF-8.
    #[error("METS document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The source document is not well-formed XML.
    #[error("failed to parse METS document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The document parsed but its root is not a METS element.
    #[error("not a METS document: root element is <{root}>")]
    NotMets { root: String },

    /// The package has no dmdSec blocks at all.
    #[error("descriptive metadata (dmdSec) missing")]
    MissingDescriptiveMetadata,

    /// An administrative section describes a file but carries no size.
    #[error("administrative section {adm_id}: empty size")]
    MissingSize { adm_id: String },

    /// An administrative section's size is not a non-negative integer.
    #[error("administrative section {adm_id}: invalid size '{value}': {source}")]
    InvalidSize {
        adm_id: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The summed size of all described files does not fit in 64 bits.
    #[error("total file size exceeds {}", u64::MAX)]
    TotalSizeOverflow,

    /// The package name cannot be used as a single output file name.
    #[error("package name '{name}' is not a plain file name")]
    UnsafePackageName { name: String },

    /// The format-identification event detail is not `key="value"; ...`.
    #[error("malformed tool detail '{detail}': {reason}")]
    MalformedToolDetail { detail: String, reason: String },

    /// The structural map nests deeper than the walker allows.
    #[error("structural map nested deeper than {limit} levels")]
    StructureTooDeep { limit: usize },

    /// The manifest could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The manifest could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetsError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    pub fn malformed_tool_detail(detail: &str, reason: impl Into<String>) -> Self {
        Self::MalformedToolDetail {
            detail: detail.to_string(),
            reason: reason.into(),
        }
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage { .. } => 2,
            Self::Serialize(_) | Self::Write { .. } => 3,
            _ => 1,
        }
    }
}
