//! Error types for Kiln operations.
//!
//! [`DocumentError`] covers everything that can go wrong with a single
//! dashboard file; [`KilnError`] wraps it with the directory-level failures of
//! the render pipeline.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to render one dashboard document.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the JSON error so
/// callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {err}")]
    Parse { err: serde_json::Error, src: String },

    #[error("Dashboard JSON must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("Failed to serialize dashboard: {0}")]
    Serialize(serde_json::Error),
}

impl DocumentError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// The main error type for Kiln operations.
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("No dashboard JSON files found in {}", .0.display())]
    NoDashboards(PathBuf),

    #[error("Failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

impl KilnError {
    /// Create a new `Render` error for the file at `path`.
    pub fn new_render_error(path: impl Into<PathBuf>, source: DocumentError) -> Self {
        Self::Render {
            path: path.into(),
            source,
        }
    }
}
