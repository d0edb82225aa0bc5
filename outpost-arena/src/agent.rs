//! Agents: whoever picks the next action for a side.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use outpost_core::{order_actions, Action, Board};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{ArenaError, Result};

/// Chooses an action for the side to move.
///
/// `actions` is the current player's per-piece action lists and is never
/// empty; the driver handles passes itself. Implementations may use the
/// board for lookahead but must leave it as they found it.
pub trait Agent {
    fn name(&self) -> &str;

    /// Whether the agent reads its moves from a person.
    fn is_human(&self) -> bool {
        false
    }

    fn choose(&mut self, board: &mut Board, actions: &[Vec<Action>]) -> Result<Action>;
}

// ========== Random ==========

/// Picks a random piece, then a random action of that piece.
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    /// Create an agent seeded from `seed`, or from the OS when None.
    pub fn new(name: impl Into<String>, seed: Option<u64>) -> RandomAgent {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        RandomAgent {
            name: name.into(),
            rng,
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, _board: &mut Board, actions: &[Vec<Action>]) -> Result<Action> {
        actions
            .choose(&mut self.rng)
            .and_then(|piece_actions| piece_actions.choose(&mut self.rng))
            .copied()
            .ok_or_else(|| ArenaError::NoActions {
                agent: self.name.clone(),
            })
    }
}

// ========== Minimax ==========

/// Plays the alpha-beta search result at a fixed depth.
pub struct MinimaxAgent {
    name: String,
    depth: u32,
}

impl MinimaxAgent {
    pub fn new(name: impl Into<String>, depth: u32) -> MinimaxAgent {
        MinimaxAgent {
            name: name.into(),
            depth,
        }
    }
}

impl Agent for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, board: &mut Board, actions: &[Vec<Action>]) -> Result<Action> {
        let (eval, stats) = board.search_with_stats(self.depth);
        debug!(
            agent = %self.name,
            value = eval.value,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            "minimax choice"
        );
        // Settled roots carry no action; fall back to the first ordered one
        eval.action
            .or_else(|| order_actions(actions).first().copied())
            .ok_or_else(|| ArenaError::NoActions {
                agent: self.name.clone(),
            })
    }
}

// ========== Human ==========

/// Prompt shown before each read.
pub const PROMPT: &str = "Choose piece, and option (format: 'piece,action')";

/// A line source that several human seats can read from in turn.
///
/// Reads never buffer past the returned line on the agent's side, so a seat
/// cannot swallow input meant for the next one.
pub trait LineSource {
    /// Append one line to `buf`, returning 0 at end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl LineSource for &[u8] {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl<R: BufRead> LineSource for Rc<RefCell<R>> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(&mut *self.borrow_mut(), buf)
    }
}

/// Reads `piece,action` index pairs from `input`, writing the menu and
/// prompts to `output`. Re-prompts until the pair names an offered action.
pub struct HumanAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> HumanAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> HumanAgent<R, W> {
        HumanAgent {
            name: name.into(),
            input,
            output,
        }
    }

    fn print_menu(&mut self, actions: &[Vec<Action>]) -> Result<()> {
        for (p, piece_actions) in actions.iter().enumerate() {
            for (a, action) in piece_actions.iter().enumerate() {
                writeln!(self.output, "[{p},{a}] {action}")?;
            }
        }
        Ok(())
    }
}

impl<R: LineSource, W: Write> Agent for HumanAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_human(&self) -> bool {
        true
    }

    fn choose(&mut self, _board: &mut Board, actions: &[Vec<Action>]) -> Result<Action> {
        if actions.is_empty() {
            return Err(ArenaError::NoActions {
                agent: self.name.clone(),
            });
        }
        self.print_menu(actions)?;

        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT} ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ArenaError::InputClosed);
            }
            if let Some(action) = parse_choice(&line, actions) {
                return Ok(action);
            }
            writeln!(self.output, "No such option: {}", line.trim())?;
        }
    }
}

/// Resolve a `piece,action` index pair against the nested action lists.
pub fn parse_choice(line: &str, actions: &[Vec<Action>]) -> Option<Action> {
    let (piece, action) = line.trim().split_once(',')?;
    let piece: usize = piece.trim().parse().ok()?;
    let action: usize = action.trim().parse().ok()?;
    actions.get(piece)?.get(action).copied()
}
