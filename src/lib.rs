//! # Bigram - persistent word-pair frequencies
//!
//! Turns plain-text documents into counts of adjacent word pairs.
//!
//! Bigram provides:
//! - A word dictionary assigning stable positive ids to distinct words
//! - An aggregator counting ordered id pairs, ignoring malformed ids
//! - An ingestion pipeline feeding token sequences through both
//! - SQLite-backed storage with an explicit connect/close/reset lifecycle

pub mod storage;
pub mod dictionary;
pub mod bigram;
pub mod ingest;
pub mod tokenize;
pub mod config;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use storage::{Store, StoreHandle, StoreStats};
pub use dictionary::WordId;
pub use bigram::BigramRow;
pub use ingest::IngestReport;
pub use tokenize::Tokenizer;

/// Result type alias for Bigram operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bigram operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store handle is closed")]
    HandleClosed,
}
