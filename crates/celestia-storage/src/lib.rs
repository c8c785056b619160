//! Celestia Storage Layer
//!
//! SQLite-backed key-value medium for editor state.
//! Multi-key writes go through a single transaction.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
