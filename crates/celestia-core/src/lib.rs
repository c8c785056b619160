//! Celestia Core
//!
//! Composition root for the editor shell: configuration, storage and the tab
//! session. The editing widget and everything it renders live outside.

mod config;
mod editor;
mod error;
mod export;

pub use config::Config;
pub use editor::Editor;
pub use error::CoreError;
pub use export::DirectoryExporter;

// Re-export core components
pub use celestia_session::{
    DetachedBinding, EditorBinding, FileExporter, Session, SessionError, SessionEvent,
    SessionOptions, SessionStore, TabSessionManager,
};
pub use celestia_storage::{Database, StorageError};
pub use celestia_tabs::{Language, Snapshot, Tab, TabError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
