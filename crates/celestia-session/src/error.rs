//! Session error types
//!
//! Most variants describe a refused operation. The manager logs them and turns
//! the call into a no-op instead of returning them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Tab limit reached ({max} tabs)")]
    QuotaExceeded { max: usize },

    #[error("Tab is protected: {0}")]
    ProtectedTab(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Script numbers exhausted")]
    AutoNumberExhausted,

    #[error("No active tab")]
    NoActiveTab,

    #[error("Session invariant violated: {0}")]
    InvariantViolated(String),

    #[error("Tab error: {0}")]
    Tab(#[from] celestia_tabs::TabError),

    #[error("Storage error: {0}")]
    Storage(#[from] celestia_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}
