//! Driver errors.

use outpost_core::GameError;
use thiserror::Error;

/// Errors raised while playing, benchmarking or loading configuration.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error(transparent)]
    Game(#[from] GameError),

    /// The game hit the ply cap without a decision.
    #[error("game did not complete within {plies} plies")]
    DidNotComplete { plies: u32 },

    /// An agent was asked to choose from an empty action list.
    #[error("agent `{agent}` was given no actions to choose from")]
    NoActions { agent: String },

    #[error("input closed before a choice was made")]
    InputClosed,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
