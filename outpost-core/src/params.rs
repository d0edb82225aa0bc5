//! Tunable game and evaluation parameters.

use serde::{Deserialize, Serialize};

/// What happens when the side to move has no legal action.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridlockRule {
    /// The stuck side loses immediately.
    #[default]
    Loses,
    /// The stuck side passes; the game ends only when both sides are stuck
    /// in a row, and then the side to move loses.
    Passes,
}

/// Parameters passed to [`crate::Board::new`].
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Weight of positional progress against actual points in `eval_state`.
    pub eval_weight: f64,
    pub gridlock: GridlockRule,
}

impl Params {
    pub const DEFAULT_EVAL_WEIGHT: f64 = 0.95;
}

impl Default for Params {
    fn default() -> Self {
        Self {
            eval_weight: Self::DEFAULT_EVAL_WEIGHT,
            gridlock: GridlockRule::default(),
        }
    }
}
