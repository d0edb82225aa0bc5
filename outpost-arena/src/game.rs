//! Game loop: alternate agents until a side wins.

use outpost_core::{Board, GridlockRule, Params, Side, DEFAULT_WINNING_SCORE};
use serde::Serialize;
use tracing::{debug, trace};

use crate::agent::Agent;
use crate::error::{ArenaError, Result};

/// Plies after which a game is abandoned.
pub const DEFAULT_MAX_PLIES: u32 = 500;

/// Per-game settings shared by every game of a run.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GameSettings {
    pub winning_score: u32,
    pub max_plies: u32,
    pub params: Params,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            winning_score: DEFAULT_WINNING_SCORE,
            max_plies: DEFAULT_MAX_PLIES,
            params: Params::default(),
        }
    }
}

impl GameSettings {
    /// Reject settings under which no game can be played.
    pub fn validate(&self) -> Result<()> {
        if self.winning_score == 0 {
            return Err(ArenaError::Config("winning score must be > 0".to_string()));
        }
        if self.max_plies == 0 {
            return Err(ArenaError::Config("max plies must be > 0".to_string()));
        }
        Ok(())
    }
}

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    ScoreReached,
    Gridlock,
}

/// Outcome of one completed game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct GameReport {
    pub winner: Side,
    /// `(Min, Max)`, i.e. `(pl1, pl2)`.
    pub scores: (u32, u32),
    /// Plies played, passes included.
    pub plies: u32,
    pub ending: Ending,
}

/// Play a fresh game. `pl1` plays Min and moves first, `pl2` plays Max.
///
/// With `interactive`, the board and scores are printed after every ply.
pub fn run_game(
    pl1: &mut dyn Agent,
    pl2: &mut dyn Agent,
    settings: &GameSettings,
    interactive: bool,
) -> Result<GameReport> {
    settings.validate()?;
    let mut board = Board::new(
        pl1.is_human(),
        pl2.is_human(),
        settings.winning_score,
        settings.params,
    );
    play_from(&mut board, pl1, pl2, settings.max_plies, interactive)
}

/// Continue a game from `board` until it is decided.
///
/// A side without actions loses or passes according to the board's
/// [`GridlockRule`]. Returns [`ArenaError::DidNotComplete`] once
/// `max_plies` plies have been played without a decision.
pub fn play_from(
    board: &mut Board,
    pl1: &mut dyn Agent,
    pl2: &mut dyn Agent,
    max_plies: u32,
    interactive: bool,
) -> Result<GameReport> {
    let mut plies = 0;

    loop {
        if interactive {
            println!("{board}");
        }

        let terminal = board.terminal_test();
        if let Some(winner) = board.winner() {
            return Ok(finish(board, winner, plies, Ending::ScoreReached));
        }

        let side = board.turn();
        if terminal.gridlock {
            let ends = match board.params().gridlock {
                GridlockRule::Loses => true,
                GridlockRule::Passes => !board.has_actions(side.opponent()),
            };
            if ends {
                if interactive {
                    println!("No available moves, {side} loses!");
                }
                return Ok(finish(board, side.opponent(), plies, Ending::Gridlock));
            }
        }

        if plies >= max_plies {
            return Err(ArenaError::DidNotComplete { plies });
        }

        if terminal.gridlock {
            trace!(%side, ply = plies, "no actions, passing");
            board.pass_turn()?;
        } else {
            let actions = board.current_player_actions();
            let agent: &mut dyn Agent = match side {
                Side::Min => &mut *pl1,
                Side::Max => &mut *pl2,
            };
            let action = agent.choose(board, &actions)?;
            trace!(agent = agent.name(), %action, ply = plies, "chosen");
            board.apply_permanent(action)?;
        }
        plies += 1;

        if interactive {
            let (min, max) = board.scores();
            println!("Score: {min} : {max}");
        }
    }
}

fn finish(board: &Board, winner: Side, plies: u32, ending: Ending) -> GameReport {
    let report = GameReport {
        winner,
        scores: board.scores(),
        plies,
        ending,
    };
    debug!(%winner, ?ending, plies, scores = ?report.scores, "game finished");
    report
}
