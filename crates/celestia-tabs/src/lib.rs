//! Celestia Tabs
//!
//! A tab is one open document: a name that doubles as its filename, the full
//! text, and the language derived from the name's extension.

mod error;
mod language;
mod snapshot;
mod tab;

pub use error::TabError;
pub use language::Language;
pub use snapshot::Snapshot;
pub use tab::{new_tab_id, script_name, script_number, Tab};

pub type Result<T> = std::result::Result<T, TabError>;
