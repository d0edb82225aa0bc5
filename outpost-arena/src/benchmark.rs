//! Round-robin benchmark between contenders.
//!
//! Every ordered pair of contenders (self-pairings included) plays a duel of
//! `iterations` games. The first contender of a pair plays Min and moves
//! first. Games that hit the ply cap are discarded.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use outpost_core::Side;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agent::{Agent, MinimaxAgent, RandomAgent};
use crate::config::ArenaConfig;
use crate::error::{ArenaError, Result};
use crate::game::{run_game, GameSettings};

/// Column width of the results tables.
const CELL_WIDTH: usize = 16;

/// A named agent configuration.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Contender {
    pub name: String,
    #[serde(flatten)]
    pub kind: ContenderKind,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContenderKind {
    /// Alpha-beta search over the heuristic evaluation.
    Hminimax { depth: u32 },
    Random,
}

impl Contender {
    pub fn hminimax(depth: u32) -> Contender {
        Contender {
            name: format!("hminimax-depth{depth}"),
            kind: ContenderKind::Hminimax { depth },
        }
    }

    pub fn random() -> Contender {
        Contender {
            name: "random".to_string(),
            kind: ContenderKind::Random,
        }
    }

    /// Build a fresh agent. `seed` only affects random contenders.
    pub fn agent(&self, seed: Option<u64>) -> Box<dyn Agent> {
        match self.kind {
            ContenderKind::Hminimax { depth } => Box::new(MinimaxAgent::new(&self.name, depth)),
            ContenderKind::Random => Box::new(RandomAgent::new(&self.name, seed)),
        }
    }
}

/// Minimax at depths 2 to 6 plus a random player, sorted by name.
pub fn default_contenders() -> Vec<Contender> {
    let mut contenders: Vec<Contender> = (2..=6).map(Contender::hminimax).collect();
    contenders.push(Contender::random());
    contenders.sort_by(|a, b| a.name.cmp(&b.name));
    contenders
}

/// Every ordered pair of contenders, self-pairings included.
pub fn draw_duels(contenders: &[Contender]) -> Vec<(&Contender, &Contender)> {
    contenders
        .iter()
        .flat_map(|pl1| contenders.iter().map(move |pl2| (pl1, pl2)))
        .collect()
}

/// Unique key of a duel: `pl1|pl2`.
pub fn duel_key(pl1: &Contender, pl2: &Contender) -> String {
    format!("{}|{}", pl1.name, pl2.name)
}

/// A pair of counters, one per duel side.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Tally {
    pub pl1: u32,
    pub pl2: u32,
}

/// Results of one duel.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct DuelStats {
    pub pl1: String,
    pub pl2: String,
    pub victories: Tally,
    pub points: Tally,
    /// Games discarded at the ply cap.
    pub incomplete: u32,
    pub elapsed_secs: f64,
}

impl DuelStats {
    fn new(pl1: &Contender, pl2: &Contender) -> DuelStats {
        DuelStats {
            pl1: pl1.name.clone(),
            pl2: pl2.name.clone(),
            victories: Tally::default(),
            points: Tally::default(),
            incomplete: 0,
            elapsed_secs: 0.0,
        }
    }

    /// Games that produced a winner.
    pub fn completed(&self) -> u32 {
        self.victories.pl1 + self.victories.pl2
    }
}

/// Derive the seed of one game from a duel seed.
fn game_seed(seed: Option<u64>, game: u32, side: Side) -> Option<u64> {
    seed.map(|s| {
        s.wrapping_add(u64::from(game).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(side.index() as u64)
    })
}

/// Play `iterations` games of `pl1` (Min) against `pl2` (Max).
///
/// Stops early, keeping what was played, once `running` is cleared.
pub fn run_duel(
    pl1: &Contender,
    pl2: &Contender,
    iterations: u32,
    settings: &GameSettings,
    seed: Option<u64>,
    running: &AtomicBool,
) -> Result<DuelStats> {
    info!(
        pl1 = %pl1.name,
        pl2 = %pl2.name,
        iterations,
        winning_score = settings.winning_score,
        "duel started"
    );
    let start = Instant::now();
    let mut stats = DuelStats::new(pl1, pl2);

    for game in 0..iterations {
        if !running.load(Ordering::SeqCst) {
            warn!(played = game, "duel interrupted");
            break;
        }

        let mut agent1 = pl1.agent(game_seed(seed, game, Side::Min));
        let mut agent2 = pl2.agent(game_seed(seed, game, Side::Max));
        match run_game(agent1.as_mut(), agent2.as_mut(), settings, false) {
            Ok(report) => {
                match report.winner {
                    Side::Min => stats.victories.pl1 += 1,
                    Side::Max => stats.victories.pl2 += 1,
                }
                stats.points.pl1 += report.scores.0;
                stats.points.pl2 += report.scores.1;
            }
            Err(ArenaError::DidNotComplete { plies }) => {
                warn!(game, plies, "game run failed to complete, ignoring results");
                stats.incomplete += 1;
            }
            Err(e) => return Err(e),
        }
    }

    stats.elapsed_secs = start.elapsed().as_secs_f64();
    info!(
        pl1 = %stats.pl1,
        pl2 = %stats.pl2,
        victories = ?(stats.victories.pl1, stats.victories.pl2),
        points = ?(stats.points.pl1, stats.points.pl2),
        elapsed_secs = stats.elapsed_secs,
        "duel finished"
    );
    Ok(stats)
}

/// Everything a benchmark run produced.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct RunSummary {
    pub iterations: u32,
    pub winning_points: u32,
    pub max_plies: u32,
    pub seed: Option<u64>,
    /// The run was stopped before every duel finished.
    pub interrupted: bool,
    pub duels: Vec<DuelStats>,
}

impl RunSummary {
    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Run every duel of `config`, in `draw_duels` order.
pub fn run_benchmark(config: &ArenaConfig, running: &AtomicBool) -> Result<RunSummary> {
    let duels = draw_duels(&config.contenders);
    let keys: Vec<String> = duels.iter().map(|(a, b)| duel_key(a, b)).collect();
    println!("Running benchmark suite of {} tests: {:?}\n", duels.len(), keys);

    let settings = config.settings();
    let mut results = Vec::with_capacity(duels.len());
    for (index, (pl1, pl2)) in duels.into_iter().enumerate() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let seed = config.seed.map(|s| s.wrapping_add((index as u64) << 32));
        results.push(run_duel(pl1, pl2, config.iterations, &settings, seed, running)?);
    }

    Ok(RunSummary {
        iterations: config.iterations,
        winning_points: config.winning_points,
        max_plies: config.max_plies,
        seed: config.seed,
        interrupted: !running.load(Ordering::SeqCst),
        duels: results,
    })
}

/// Render the VICTORIES and POINTS matrices: rows are `pl1`, columns `pl2`,
/// cells `pl1 / pl2`. Duels that were not played show as dashes.
pub fn results_table(duels: &[DuelStats]) -> String {
    let mut out = String::new();
    render_matrix(&mut out, "VICTORIES", duels, |d| d.victories);
    render_matrix(&mut out, "POINTS", duels, |d| d.points);
    out
}

fn render_matrix(
    out: &mut String,
    title: &str,
    duels: &[DuelStats],
    pick: fn(&DuelStats) -> Tally,
) {
    let rows: BTreeSet<&str> = duels.iter().map(|d| d.pl1.as_str()).collect();
    let columns: BTreeSet<&str> = duels.iter().map(|d| d.pl2.as_str()).collect();

    out.push('\n');
    pad(out, title);
    for column in &columns {
        pad(out, column);
    }
    out.push('\n');

    for row in &rows {
        pad(out, row);
        for column in &columns {
            match duels.iter().find(|d| d.pl1 == *row && d.pl2 == *column) {
                Some(duel) => {
                    let tally = pick(duel);
                    pad(out, &format!("{} / {}", tally.pl1, tally.pl2));
                }
                None => pad(out, "--------"),
            }
        }
        out.push('\n');
    }
}

fn pad(out: &mut String, text: &str) {
    out.push_str(&format!("{text:<width$}\t", width = CELL_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpost_core::Params;

    fn settings(winning_score: u32) -> GameSettings {
        GameSettings {
            winning_score,
            max_plies: 2_000,
            params: Params::default(),
        }
    }

    fn stats(pl1: &str, pl2: &str, victories: (u32, u32), points: (u32, u32)) -> DuelStats {
        DuelStats {
            pl1: pl1.to_string(),
            pl2: pl2.to_string(),
            victories: Tally {
                pl1: victories.0,
                pl2: victories.1,
            },
            points: Tally {
                pl1: points.0,
                pl2: points.1,
            },
            incomplete: 0,
            elapsed_secs: 0.0,
        }
    }

    // ========== Contenders ==========

    #[test]
    fn test_default_contenders() {
        let names: Vec<_> = default_contenders().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "hminimax-depth2",
                "hminimax-depth3",
                "hminimax-depth4",
                "hminimax-depth5",
                "hminimax-depth6",
                "random",
            ]
        );
    }

    #[test]
    fn test_contender_agents() {
        let agent = Contender::hminimax(3).agent(None);
        assert_eq!(agent.name(), "hminimax-depth3");
        assert!(!agent.is_human());
        assert_eq!(Contender::random().agent(Some(1)).name(), "random");
    }

    #[test]
    fn test_contender_serde_shape() {
        let json = serde_json::to_value(Contender::hminimax(4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "hminimax-depth4", "type": "hminimax", "depth": 4})
        );
        let back: Contender = serde_json::from_value(json).unwrap();
        assert_eq!(back, Contender::hminimax(4));
    }

    // ========== Duels ==========

    #[test]
    fn test_draw_duels_all_ordered_pairs() {
        let contenders = default_contenders();
        let duels = draw_duels(&contenders);
        assert_eq!(duels.len(), 36);

        let keys: BTreeSet<String> = duels.iter().map(|(a, b)| duel_key(a, b)).collect();
        assert_eq!(keys.len(), 36);
        assert!(keys.contains("random|random"));
        assert!(keys.contains("hminimax-depth2|random"));
        assert!(keys.contains("random|hminimax-depth2"));
    }

    #[test]
    fn test_run_duel_counts_every_game() {
        let running = AtomicBool::new(true);
        let random = Contender::random();
        let stats = run_duel(&random, &random, 5, &settings(2), Some(9), &running).unwrap();

        assert_eq!(stats.completed() + stats.incomplete, 5);
        assert_eq!(stats.pl1, "random");
    }

    #[test]
    fn test_run_duel_is_reproducible() {
        let running = AtomicBool::new(true);
        let random = Contender::random();
        let a = run_duel(&random, &random, 4, &settings(2), Some(5), &running).unwrap();
        let b = run_duel(&random, &random, 4, &settings(2), Some(5), &running).unwrap();
        assert_eq!(a.victories, b.victories);
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn test_run_duel_discards_unfinished_games() {
        let running = AtomicBool::new(true);
        let settings = GameSettings {
            winning_score: 10,
            max_plies: 3,
            params: Params::default(),
        };
        let random = Contender::random();
        let stats = run_duel(&random, &random, 3, &settings, Some(1), &running).unwrap();
        assert_eq!(stats.incomplete, 3);
        assert_eq!(stats.completed(), 0);
        assert_eq!(stats.points, Tally::default());
    }

    #[test]
    fn test_run_duel_stops_when_interrupted() {
        let running = AtomicBool::new(false);
        let random = Contender::random();
        let stats = run_duel(&random, &random, 10, &settings(2), None, &running).unwrap();
        assert_eq!(stats.completed() + stats.incomplete, 0);
    }

    #[test]
    fn test_run_benchmark_small() {
        let config = ArenaConfig {
            iterations: 2,
            winning_points: 1,
            seed: Some(3),
            contenders: vec![Contender::hminimax(1), Contender::random()],
            ..ArenaConfig::default()
        };
        let running = AtomicBool::new(true);
        let summary = run_benchmark(&config, &running).unwrap();

        assert_eq!(summary.duels.len(), 4);
        assert!(!summary.interrupted);
        for duel in &summary.duels {
            assert_eq!(duel.completed() + duel.incomplete, 2);
        }
    }

    // ========== Output ==========

    #[test]
    fn test_results_table() {
        let duels = vec![
            stats("a", "a", (1, 1), (11, 12)),
            stats("a", "b", (2, 0), (20, 5)),
            stats("b", "b", (0, 2), (7, 20)),
        ];
        let table = results_table(&duels);
        let lines: Vec<&str> = table.lines().filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("VICTORIES"));
        assert!(lines[1].starts_with(&format!("{:<16}\t", "a")));
        assert!(lines[1].contains("1 / 1"));
        assert!(lines[1].contains("2 / 0"));
        // b never played a as pl1
        assert!(lines[2].contains("--------"));
        assert!(lines[3].starts_with("POINTS"));
        assert!(lines[4].contains("20 / 5"));
        assert!(lines[5].contains("7 / 20"));
    }

    #[test]
    fn test_summary_json() {
        let summary = RunSummary {
            iterations: 10,
            winning_points: 10,
            max_plies: 500,
            seed: None,
            interrupted: true,
            duels: vec![stats("a", "b", (3, 7), (60, 90))],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["interrupted"], true);
        assert_eq!(json["duels"][0]["victories"]["pl2"], 7);
        assert_eq!(json["duels"][0]["points"]["pl1"], 60);
    }
}
