//! Driver-level checks against the shipped configuration.

use std::sync::atomic::AtomicBool;

use outpost_arena::{run_benchmark, ArenaConfig, ContenderKind};

fn shipped_config() -> ArenaConfig {
    ArenaConfig::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../arena.toml")).unwrap()
}

#[test]
fn shipped_config_is_valid() {
    let config = shipped_config();
    assert_eq!(config.iterations, 10);
    assert_eq!(config.contenders.len(), 4);
    assert_eq!(config.contenders[3].kind, ContenderKind::Random);
}

#[test]
fn one_game_benchmark_fills_every_duel() {
    let mut config = shipped_config();
    config.iterations = 1;
    config.winning_points = 2;
    config.seed = Some(7);
    let random = config.contenders.pop().unwrap();
    config.contenders.truncate(2);
    config.contenders.push(random);

    let running = AtomicBool::new(true);
    let summary = run_benchmark(&config, &running).unwrap();
    assert_eq!(summary.duels.len(), 9);
    for duel in &summary.duels {
        assert_eq!(duel.completed() + duel.incomplete, 1, "{}|{}", duel.pl1, duel.pl2);
        if duel.completed() == 1 {
            assert!(duel.points.pl1.max(duel.points.pl2) <= 2);
        }
    }

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"hminimax-depth2\""));
}
