//! Error types for agnt-core

use thiserror::Error;

/// Result type alias using agnt-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a conversation
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the agent API layer
    #[error(transparent)]
    Api(#[from] agnt_api::Error),

    /// A request is already in flight for this conversation
    #[error("A request is already in flight for this conversation")]
    Busy,

    /// The turn token does not belong to the outstanding request
    #[error("Turn {0} is not the outstanding request")]
    StaleTurn(String),
}
