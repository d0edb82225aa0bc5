//! Outpost driver: agents, the game loop and a round-robin benchmark.
//!
//! The `outpost` binary wraps this crate with two subcommands, `play` for a
//! single (optionally human) game and `bench` for the contender benchmark.

pub mod agent;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod game;

pub use agent::{parse_choice, Agent, HumanAgent, LineSource, MinimaxAgent, RandomAgent};
pub use benchmark::{
    default_contenders, draw_duels, results_table, run_benchmark, run_duel, Contender,
    ContenderKind, DuelStats, RunSummary, Tally,
};
pub use config::ArenaConfig;
pub use error::{ArenaError, Result};
pub use game::{play_from, run_game, Ending, GameReport, GameSettings};
