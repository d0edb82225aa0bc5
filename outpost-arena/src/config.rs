//! Benchmark configuration loaded from TOML.
//!
//! ```toml
//! iterations = 10
//! winning_points = 10
//! seed = 42
//!
//! [params]
//! eval_weight = 0.95
//! gridlock = "loses"
//!
//! [[contenders]]
//! name = "hminimax-depth3"
//! type = "hminimax"
//! depth = 3
//!
//! [[contenders]]
//! name = "random"
//! type = "random"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::collections::HashSet;
use std::path::Path;

use outpost_core::Params;
use serde::{Deserialize, Serialize};

use crate::benchmark::{default_contenders, Contender, ContenderKind};
use crate::error::{ArenaError, Result};
use crate::game::{GameSettings, DEFAULT_MAX_PLIES};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Games per duel.
    pub iterations: u32,
    /// Score that ends a game.
    pub winning_points: u32,
    /// Plies after which a game is discarded.
    pub max_plies: u32,
    /// Base seed for random contenders; None seeds from the OS.
    pub seed: Option<u64>,
    pub params: Params,
    pub contenders: Vec<Contender>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            iterations: 10,
            winning_points: 10,
            max_plies: DEFAULT_MAX_PLIES,
            seed: None,
            params: Params::default(),
            contenders: default_contenders(),
        }
    }
}

impl ArenaConfig {
    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: ArenaConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(invalid("iterations must be > 0"));
        }
        if self.winning_points == 0 {
            return Err(invalid("winning_points must be > 0"));
        }
        if self.max_plies == 0 {
            return Err(invalid("max_plies must be > 0"));
        }
        if !self.params.eval_weight.is_finite() {
            return Err(invalid("params.eval_weight must be finite"));
        }
        if self.contenders.is_empty() {
            return Err(invalid("at least one contender is required"));
        }

        let mut names = HashSet::new();
        for contender in &self.contenders {
            if !names.insert(contender.name.as_str()) {
                return Err(ArenaError::Config(format!(
                    "duplicate contender name `{}`",
                    contender.name
                )));
            }
            if contender.name.contains('|') {
                return Err(ArenaError::Config(format!(
                    "contender name `{}` must not contain `|`",
                    contender.name
                )));
            }
            if let ContenderKind::Hminimax { depth: 0 } = contender.kind {
                return Err(ArenaError::Config(format!(
                    "contender `{}` needs a search depth of at least 1",
                    contender.name
                )));
            }
        }
        Ok(())
    }

    /// Settings for each game of the run.
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            winning_score: self.winning_points,
            max_plies: self.max_plies,
            params: self.params,
        }
    }
}

fn invalid(reason: &str) -> ArenaError {
    ArenaError::Config(reason.to_string())
}
