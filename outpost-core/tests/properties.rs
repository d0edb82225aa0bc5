//! Random-play properties
//!
//! Plays seeded random games and checks, at every ply:
//! - apply/undo round-trips for every legal action
//! - reserve counts stay consistent
//! - scores never decrease
//! - depth-0 search is a pure evaluation

use outpost_core::{
    order_actions, Action, ActionKind, Board, Cell, Params, Side, PIECES_PER_PLAYER,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

const GAMES: u64 = 40;
const MAX_PLIES: usize = 200;

/// Walk one random game, calling `check` on the board before every ply.
fn random_game(seed: u64, winning_score: u32, mut check: impl FnMut(&mut Board)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(false, false, winning_score, Params::default());

    for _ in 0..MAX_PLIES {
        check(&mut board);

        let terminal = board.terminal_test();
        if terminal.score_reached {
            break;
        }
        if terminal.gridlock {
            if !board.has_actions(board.turn().opponent()) {
                break;
            }
            board.pass_turn().unwrap();
            continue;
        }

        let actions: Vec<Action> = board.current_player_actions().into_iter().flatten().collect();
        let action = *actions.choose(&mut rng).unwrap();
        board.apply_permanent(action).unwrap();
    }
}

fn assert_reserve_counts(board: &Board) {
    for side in Side::BOTH {
        let player = board.player(side);
        assert_eq!(
            player.off_board() as usize + player.on_board(),
            PIECES_PER_PLAYER,
            "{side} reserve count out of sync"
        );
    }
}

#[test]
fn undo_restores_every_legal_action() {
    for seed in 0..GAMES {
        random_game(seed, 5, |board| {
            for action in board.current_player_actions().into_iter().flatten() {
                let before = board.clone();
                let undo = board.apply(action);
                assert_reserve_counts(board);
                board.assert_consistent();
                board.undo(undo);
                assert_eq!(*board, before, "seed {seed}: undo of `{action}` diverged");
            }
        });
    }
}

#[test]
fn scores_never_decrease() {
    for seed in 0..GAMES {
        let mut last = (0, 0);
        random_game(seed, 10, |board| {
            let (min, max) = board.scores();
            assert!(min >= last.0 && max >= last.1, "seed {seed}: score went down");
            last = (min, max);
        });
    }
}

#[test]
fn depth_zero_search_is_pure_evaluation() {
    for seed in 0..GAMES / 4 {
        random_game(seed, 10, |board| {
            let terminal = board.terminal_test();
            if terminal.score_reached || terminal.gridlock {
                return;
            }
            let before = board.clone();
            let eval = board.search(0);
            assert!(eval.value.is_finite());
            assert_eq!(eval.value, board.eval_state());
            assert_eq!(eval.action, None);
            assert_eq!(*board, before);
        });
    }
}

#[test]
fn shallow_search_leaves_board_untouched() {
    for seed in 0..4 {
        random_game(seed, 3, |board| {
            let before = board.clone();
            let eval = board.search(2);
            assert_eq!(*board, before, "seed {seed}: search mutated the board");
            if let Some(action) = eval.action {
                let offered = board.current_player_actions().into_iter().flatten();
                assert!(offered.into_iter().any(|a| a == action));
            }
        });
    }
}

#[test]
fn ordering_ignores_generation_order() {
    for seed in 0..GAMES / 4 {
        random_game(seed, 10, |board| {
            let nested = board.current_player_actions();
            let reversed: Vec<Vec<Action>> = nested
                .iter()
                .rev()
                .map(|list| list.iter().rev().copied().collect())
                .collect();
            assert_eq!(order_actions(&nested), order_actions(&reversed));
        });
    }
}

// ========== Fixed positions ==========

#[test]
fn empty_board_offers_only_home_row_inserts() {
    let board = Board::default();
    let actions: Vec<Action> = board.current_player_actions().into_iter().flatten().collect();

    assert_eq!(actions.len(), 3);
    assert!(actions.iter().all(|a| a.kind == ActionKind::Insert && a.from.is_none()));
    let mut targets: Vec<_> = actions.iter().filter_map(|a| a.to).collect();
    targets.sort();
    assert_eq!(targets, vec![Cell(0), Cell(1), Cell(2)]);
}

#[test]
fn piece_on_goal_row_can_only_score() {
    let mut board = Board::default();
    board.put_piece(Side::Min, 2, Cell(9));

    let piece_actions = board.player(Side::Min).piece(2).actions(&board);
    assert_eq!(
        piece_actions,
        vec![Action::new(Some(Cell(9)), None, ActionKind::Diag, 2, true)]
    );
}

#[test]
fn opponent_ahead_allows_attack_and_jump() {
    let mut board = Board::default();
    board.put_piece(Side::Min, 0, Cell(4));
    board.put_piece(Side::Max, 0, Cell(7));

    let actions = board.player(Side::Min).piece(0).actions(&board);
    assert!(actions.contains(&Action::new(
        Some(Cell(4)),
        Some(Cell(7)),
        ActionKind::Attack,
        0,
        false
    )));
    assert!(actions.contains(&Action::new(
        Some(Cell(4)),
        Some(Cell(10)),
        ActionKind::Jump,
        0,
        false
    )));
}

#[test]
fn search_takes_the_winning_point() {
    let mut board = Board::new(false, false, 1, Params::default());
    board.put_piece(Side::Max, 0, Cell(1));
    board.put_piece(Side::Min, 0, Cell(6));
    board.set_turn(Side::Max);

    let eval = board.search(1);
    assert_eq!(
        eval.action,
        Some(Action::new(Some(Cell(1)), None, ActionKind::Diag, 0, true))
    );
    assert!(eval.value > 0.0);
}
