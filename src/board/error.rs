//! Error types for board operations.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for board operations.
pub type BoardResult<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Initial load has not finished
    #[error("board is still loading")]
    NotReady,

    /// Board was closed; in-flight calls were abandoned
    #[error("board is closed")]
    Closed,

    /// Draft rejected before reaching the store
    #[error("invalid task: {0}")]
    Invalid(StoreError),

    /// Store call failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
