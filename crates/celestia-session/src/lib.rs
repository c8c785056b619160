//! Celestia Session Management
//!
//! - A session is the ordered set of open tabs plus the active-tab pointer
//! - The first tab is the protected welcome document
//! - Sessions auto-save after every mutation and at teardown
//! - A corrupt saved session degrades to a fresh one; initialization never fails

mod binding;
mod error;
mod event;
mod manager;
mod session;
mod store;

pub use binding::{DetachedBinding, EditorBinding, FileExporter};
pub use error::SessionError;
pub use event::SessionEvent;
pub use manager::TabSessionManager;
pub use session::{Session, SessionOptions, MAX_TABS, WELCOME_CONTENT, WELCOME_ID, WELCOME_NAME};
pub use store::{SessionStore, ACTIVE_TAB_KEY, ARCHIVE_KEY, AUTO_NUMBER_KEY, TABS_KEY};

pub use celestia_tabs::{Language, Snapshot, Tab};

pub type Result<T> = std::result::Result<T, SessionError>;
