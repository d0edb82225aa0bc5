//! Depth-limited alpha-beta minimax over the board's apply/undo primitives.
//!
//! Max maximizes [`Board::eval_state`], Min minimizes it. Every node applies a
//! candidate, recurses and undoes it before trying the next, so the board is
//! back in its original state whenever a search call returns.

use std::time::Instant;

use tracing::debug;

use crate::{Action, Board, GridlockRule, Side};

/// Value of a decided game, positive when Max wins.
pub const WIN_VALUE: f64 = 100_000.0;

/// A node value and the action that achieves it.
///
/// `action` is None at leaves, at terminal nodes and when the only option
/// was a pass.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Evaluation {
    pub value: f64,
    pub action: Option<Action>,
}

impl Evaluation {
    #[inline]
    fn settled(value: f64) -> Evaluation {
        Evaluation {
            value,
            action: None,
        }
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SearchStats {
    /// Nodes visited, root included
    pub nodes: u64,
    /// Depth-0 nodes scored by `eval_state`
    pub leaves: u64,
    /// Nodes ended by score or gridlock
    pub terminals: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    /// Synthetic passes played
    pub passes: u64,
}

/// Flatten per-piece action lists and order them deterministically.
///
/// Sorts by kind, then by `(from, to, piece, scores)`.
pub fn order_actions(nested: &[Vec<Action>]) -> Vec<Action> {
    let mut actions: Vec<Action> = nested.iter().flatten().copied().collect();
    actions.sort_by_key(Action::order_key);
    actions
}

/// How a node is resolved before any recursion.
enum Node {
    Settled(f64),
    Pass,
    Expand(Vec<Action>),
}

#[inline]
fn win_for(side: Side) -> f64 {
    match side {
        Side::Max => WIN_VALUE,
        Side::Min => -WIN_VALUE,
    }
}

impl Board {
    /// Search for the side to move with a full window.
    pub fn search(&mut self, depth: u32) -> Evaluation {
        self.search_with_stats(depth).0
    }

    /// Search for the side to move with a full window, returning counters.
    pub fn search_with_stats(&mut self, depth: u32) -> (Evaluation, SearchStats) {
        let mut stats = SearchStats::default();
        let start = Instant::now();
        let side = self.turn();

        let eval = match side {
            Side::Max => self.maximize(f64::NEG_INFINITY, f64::INFINITY, depth, &mut stats),
            Side::Min => self.minimize(f64::NEG_INFINITY, f64::INFINITY, depth, &mut stats),
        };

        debug!(
            %side,
            depth,
            value = eval.value,
            action = ?eval.action,
            nodes = stats.nodes,
            leaves = stats.leaves,
            cutoffs = stats.cutoffs,
            elapsed_us = start.elapsed().as_micros() as u64,
            "search finished"
        );
        (eval, stats)
    }

    /// Alpha-beta node for Max.
    pub fn max_alpha_beta(&mut self, alpha: f64, beta: f64, depth: u32) -> Evaluation {
        self.maximize(alpha, beta, depth, &mut SearchStats::default())
    }

    /// Alpha-beta node for Min.
    pub fn min_alpha_beta(&mut self, alpha: f64, beta: f64, depth: u32) -> Evaluation {
        self.minimize(alpha, beta, depth, &mut SearchStats::default())
    }

    fn open_node(&self, depth: u32, stats: &mut SearchStats) -> Node {
        stats.nodes += 1;
        let side = self.turn();

        if let Some(winner) = self.winner() {
            stats.terminals += 1;
            return Node::Settled(win_for(winner));
        }

        // One generation serves both the gridlock test and the expansion
        let actions = order_actions(&self.current_player_actions());
        if actions.is_empty() {
            let ends = match self.params().gridlock {
                GridlockRule::Loses => true,
                GridlockRule::Passes => !self.has_actions(side.opponent()),
            };
            if ends {
                stats.terminals += 1;
                return Node::Settled(win_for(side.opponent()));
            }
        }
        if depth == 0 {
            stats.leaves += 1;
            return Node::Settled(self.eval_state());
        }

        if actions.is_empty() {
            Node::Pass
        } else {
            Node::Expand(actions)
        }
    }

    fn maximize(
        &mut self,
        mut alpha: f64,
        beta: f64,
        depth: u32,
        stats: &mut SearchStats,
    ) -> Evaluation {
        let actions = match self.open_node(depth, stats) {
            Node::Settled(value) => return Evaluation::settled(value),
            Node::Pass => {
                stats.passes += 1;
                let undo = self.pass();
                let reply = self.minimize(alpha, beta, depth - 1, stats);
                self.undo(undo);
                return Evaluation::settled(reply.value);
            }
            Node::Expand(actions) => actions,
        };

        let mut best = Evaluation::settled(f64::NEG_INFINITY);
        for action in actions {
            let undo = self.apply(action);
            let reply = self.minimize(alpha, beta, depth - 1, stats);
            self.undo(undo);

            if reply.value > best.value {
                best = Evaluation {
                    value: reply.value,
                    action: Some(action),
                };
            }
            if best.value >= beta {
                stats.cutoffs += 1;
                return best;
            }
            if best.value > alpha {
                alpha = best.value;
            }
        }
        best
    }

    fn minimize(
        &mut self,
        alpha: f64,
        mut beta: f64,
        depth: u32,
        stats: &mut SearchStats,
    ) -> Evaluation {
        let actions = match self.open_node(depth, stats) {
            Node::Settled(value) => return Evaluation::settled(value),
            Node::Pass => {
                stats.passes += 1;
                let undo = self.pass();
                let reply = self.maximize(alpha, beta, depth - 1, stats);
                self.undo(undo);
                return Evaluation::settled(reply.value);
            }
            Node::Expand(actions) => actions,
        };

        let mut best = Evaluation::settled(f64::INFINITY);
        for action in actions {
            let undo = self.apply(action);
            let reply = self.maximize(alpha, beta, depth - 1, stats);
            self.undo(undo);

            if reply.value < best.value {
                best = Evaluation {
                    value: reply.value,
                    action: Some(action),
                };
            }
            if best.value <= alpha {
                stats.cutoffs += 1;
                return best;
            }
            if best.value < beta {
                beta = best.value;
            }
        }
        best
    }
}
