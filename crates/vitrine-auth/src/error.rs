//! Session error types.

use thiserror::Error;

/// Session error type.
///
/// Credential problems are not errors here: the decoder and validator
/// report them through `None` and the verdict fields, never by failing.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] vitrine_storage::StorageError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
