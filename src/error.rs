//! Error types for the fallible edges of the crate.
//!
//! The footprint math, rating and tip selection never fail; only catalog
//! extension, persistence and import can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("activity '{0}' is already defined")]
    DuplicateId(String),

    #[error("activity '{id}' has invalid emission factor {factor}")]
    InvalidFactor { id: String, factor: f64 },

    #[error("unknown activity category '{0}'")]
    UnknownCategory(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("stored activity '{id}' is invalid: {source}")]
    InvalidDefinition {
        id: String,
        #[source]
        source: CatalogError,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Regex(#[from] regex::Error),
}
