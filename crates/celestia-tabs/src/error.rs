//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab name cannot be empty")]
    EmptyName,

    #[error("Tab id cannot be empty")]
    EmptyId,
}
