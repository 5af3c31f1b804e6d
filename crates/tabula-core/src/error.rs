//! Error types for the Tabula core.

use std::path::PathBuf;
use thiserror::Error;

use crate::document::DocumentId;

/// Errors that can occur in the Tabula core.
///
/// Formula and numeric problems are not represented here: unrecognized
/// formulas degrade to text and unreadable numbers are skipped during
/// aggregation, so neither ever surfaces as an error.
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error("Corrupt document record {path:?}: {message}")]
    CorruptRecord { path: PathBuf, message: String },

    #[error("Failed to encode document record: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TabulaError>;
