//! Outpost command line.
//!
//! ```text
//! outpost play [--human-first] [--human-second] [--depth N] [--random-opponent]
//! outpost bench [--config arena.toml] [--iterations N] [--summary out.json]
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use outpost_arena::game::DEFAULT_MAX_PLIES;
use outpost_arena::{
    results_table, run_benchmark, run_game, Agent, ArenaConfig, Ending, GameSettings, HumanAgent,
    MinimaxAgent, RandomAgent, Result,
};
use outpost_core::{Params, Side, DEFAULT_WINNING_SCORE};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "outpost=info,outpost_arena=info,outpost_core=info";

#[derive(Parser, Debug)]
#[command(name = "outpost", version, about = "Outpost: a 4x3 capture/race board game")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one game on the terminal.
    Play {
        /// A person plays Min (moves first).
        #[arg(long)]
        human_first: bool,

        /// A person plays Max.
        #[arg(long)]
        human_second: bool,

        /// Search depth of computer players.
        #[arg(long, default_value_t = 4)]
        depth: u32,

        /// Computer players move at random instead of searching.
        #[arg(long)]
        random_opponent: bool,

        /// Score that ends the game; must be at least 1.
        #[arg(long, default_value_t = DEFAULT_WINNING_SCORE)]
        winning_score: u32,

        /// Stop after this many plies.
        #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
        max_plies: u32,

        /// Seed for random players.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run every contender against every other one.
    Bench {
        /// TOML configuration; defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override games per duel.
        #[arg(long)]
        iterations: Option<u32>,

        /// Override the winning score.
        #[arg(long)]
        winning_points: Option<u32>,

        /// Override the base seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the run summary as JSON.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Play {
            human_first,
            human_second,
            depth,
            random_opponent,
            winning_score,
            max_plies,
            seed,
        } => {
            let settings = GameSettings {
                winning_score,
                max_plies,
                params: Params::default(),
            };
            // Human seats share the process-wide stdin buffer
            let seat = |human: bool, side: Side| -> Box<dyn Agent> {
                let name = format!("{side}");
                if human {
                    Box::new(HumanAgent::new(name, io::stdin(), io::stdout()))
                } else if random_opponent {
                    Box::new(RandomAgent::new(name, seed.map(|s| s.wrapping_add(side.index() as u64))))
                } else {
                    Box::new(MinimaxAgent::new(name, depth))
                }
            };
            play(
                seat(human_first, Side::Min),
                seat(human_second, Side::Max),
                &settings,
            )
        }
        Command::Bench {
            config,
            iterations,
            winning_points,
            seed,
            summary,
        } => bench(config, iterations, winning_points, seed, summary),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn play(
    mut pl1: Box<dyn Agent>,
    mut pl2: Box<dyn Agent>,
    settings: &GameSettings,
) -> Result<()> {
    let report = run_game(pl1.as_mut(), pl2.as_mut(), settings, true)?;
    let (min, max) = report.scores;
    match report.ending {
        Ending::ScoreReached => println!("{} wins {min} : {max}", report.winner),
        Ending::Gridlock => println!("{} wins by gridlock ({min} : {max})", report.winner),
    }
    info!(plies = report.plies, "game over");
    Ok(())
}

fn bench(
    config: Option<PathBuf>,
    iterations: Option<u32>,
    winning_points: Option<u32>,
    seed: Option<u64>,
    summary: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            ArenaConfig::load(path)?
        }
        None => ArenaConfig::default(),
    };
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    if let Some(winning_points) = winning_points {
        config.winning_points = winning_points;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;

    // Finish the current game, then report what was played
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, finishing the current game...");
        r.store(false, Ordering::SeqCst);
    }) {
        error!("failed to install the Ctrl-C handler: {e}");
    }

    let run = run_benchmark(&config, &running)?;
    println!("{}", results_table(&run.duels));

    if run.interrupted {
        info!(duels = run.duels.len(), "benchmark interrupted");
    }
    if let Some(path) = summary {
        run.write_json(&path)?;
        info!(path = %path.display(), "run summary written");
    }
    Ok(())
}
