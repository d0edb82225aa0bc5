//! Error types for board operations.

use thiserror::Error;

use crate::{Action, Side};

/// Contract violations a caller can recover from.
///
/// Internal desynchronization (a mismatched undo token, a cell pointing at an
/// off-board piece) is not reported here; it panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The action is not among the actions the generator offers right now.
    #[error("action `{action}` is not available to {side}")]
    InvalidAction { action: Action, side: Side },

    /// A pass was requested while the side to move still has actions.
    #[error("{side} cannot pass while it has legal actions")]
    IllegalPass { side: Side },
}

/// Result type alias for board operations.
pub type Result<T> = std::result::Result<T, GameError>;
