//! Board state: grid, players, turn and scores, with reversible updates.

use std::fmt;

use tracing::trace;

use crate::{
    Action, ActionKind, Cell, GameError, Params, Piece, PieceRef, Player, Result, Side, CELLS,
    COLS, PIECES_PER_PLAYER, ROWS,
};

/// Points needed to win unless configured otherwise.
pub const DEFAULT_WINNING_SCORE: u32 = 10;

/// Read-only occupancy grid: `(1 + piece id) * side id` per cell, 0 if empty.
pub type Snapshot = [[i8; COLS as usize]; ROWS as usize];

/// Result of [`Board::terminal_test`]. The two flags are independent.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Terminal {
    /// The side to move has no legal action.
    pub gridlock: bool,
    /// A side's score reached the winning score.
    pub score_reached: bool,
}

/// Undo information for backtracking during search.
///
/// Returned by [`Board::apply`] / [`Board::pass`] and consumed by
/// [`Board::undo`]. Tokens must be undone in reverse order of application.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    /// The applied action; None for a pass.
    pub action: Option<Action>,
    /// Side that moved.
    pub mover: Side,
    /// Defender removed by an `Attack`.
    pub captured: Option<PieceRef>,
}

/// Full game state.
#[derive(Clone, PartialEq, Debug)]
pub struct Board {
    cells: [Option<PieceRef>; CELLS],
    players: [Player; 2],
    turn: Side,
    scores: [u32; 2],
    winning_score: u32,
    params: Params,
}

impl Board {
    /// Create a new game with every piece in reserve and Min to move.
    pub fn new(
        pl1_is_human: bool,
        pl2_is_human: bool,
        winning_score: u32,
        params: Params,
    ) -> Board {
        Board {
            cells: [None; CELLS],
            players: [
                Player::new(Side::Min, pl1_is_human),
                Player::new(Side::Max, pl2_is_human),
            ],
            turn: Side::Min,
            scores: [0; 2],
            winning_score,
            params,
        }
    }

    // ========== Accessors ==========

    /// Side to move.
    #[inline]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[inline]
    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    /// Resolve a piece handle.
    #[inline]
    pub fn piece(&self, handle: PieceRef) -> &Piece {
        self.player(handle.side).piece(handle.id)
    }

    /// Handle of the piece on `cell`, if any.
    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<PieceRef> {
        self.cells[cell.index()]
    }

    #[inline]
    pub fn is_empty(&self, cell: Cell) -> bool {
        self.cells[cell.index()].is_none()
    }

    /// Scores as `(Min, Max)`.
    #[inline]
    pub fn scores(&self) -> (u32, u32) {
        (self.scores[0], self.scores[1])
    }

    #[inline]
    pub fn score(&self, side: Side) -> u32 {
        self.scores[side.index()]
    }

    #[inline]
    pub fn winning_score(&self) -> u32 {
        self.winning_score
    }

    #[inline]
    pub fn params(&self) -> &Params {
        &self.params
    }

    // ========== Setup ==========

    /// Move a reserve piece straight onto `cell`, outside of normal play.
    ///
    /// Does NOT validate game rules; intended for setting up positions.
    /// Panics if the cell is taken or the piece is already on the board.
    pub fn put_piece(&mut self, side: Side, id: u8, cell: Cell) {
        assert!(self.is_empty(cell), "cell {cell} is already occupied");
        let player = &mut self.players[side.index()];
        let piece = &mut player.pieces[id as usize];
        assert!(!piece.on_board(), "piece {id} of {side} is already on the board");
        piece.position = Some(cell);
        player.off_board -= 1;
        self.cells[cell.index()] = Some(PieceRef::new(side, id));
    }

    /// Set the side to move, outside of normal play.
    pub fn set_turn(&mut self, side: Side) {
        self.turn = side;
    }

    /// Set a side's score, outside of normal play.
    pub fn set_score(&mut self, side: Side, score: u32) {
        self.scores[side.index()] = score;
    }

    // ========== Move generation ==========

    /// Actions of the side to move, grouped per piece.
    pub fn current_player_actions(&self) -> Vec<Vec<Action>> {
        self.current_player().actions(self)
    }

    /// Whether `side` has at least one action.
    pub fn has_actions(&self, side: Side) -> bool {
        self.player(side).has_actions(self)
    }

    // ========== Apply & Undo ==========

    /// Apply an action generated for the side to move, returning undo info.
    ///
    /// Mutates the board in place and passes the turn. Does NOT check the
    /// action against the generator; use [`Board::apply_permanent`] for that.
    pub fn apply(&mut self, action: Action) -> Undo {
        let mover = self.turn;

        // Defender goes back to its owner's reserve
        let captured = if action.kind == ActionKind::Attack {
            let cell = action.to.expect("attack without a target cell");
            let defender = self.cells[cell.index()]
                .take()
                .expect("attack on an empty cell");
            let owner = &mut self.players[defender.side.index()];
            owner.pieces[defender.id as usize].position = None;
            owner.off_board += 1;
            Some(defender)
        } else {
            None
        };

        let player = &mut self.players[mover.index()];
        match (action.from, action.to) {
            (None, Some(_)) => player.off_board -= 1,
            (Some(_), None) => player.off_board += 1,
            _ => {}
        }
        player.pieces[action.piece as usize].position = action.to;

        if let Some(from) = action.from {
            self.cells[from.index()] = None;
        }
        if let Some(to) = action.to {
            self.cells[to.index()] = Some(PieceRef::new(mover, action.piece));
        }

        if action.scores {
            self.scores[mover.index()] += 1;
        }
        self.turn = mover.opponent();

        Undo {
            action: Some(action),
            mover,
            captured,
        }
    }

    /// Pass the turn without moving (the side to move has no action).
    pub fn pass(&mut self) -> Undo {
        let mover = self.turn;
        self.turn = mover.opponent();
        Undo {
            action: None,
            mover,
            captured: None,
        }
    }

    /// Undo a move, restoring the board to its previous state.
    ///
    /// This is the inverse of `apply()` / `pass()`. Panics when the token
    /// does not match the current board.
    pub fn undo(&mut self, undo: Undo) {
        assert_eq!(
            self.turn,
            undo.mover.opponent(),
            "undo token for {} does not match the side to move",
            undo.mover
        );

        let Some(action) = undo.action else {
            self.turn = undo.mover;
            return;
        };

        if action.scores {
            let score = &mut self.scores[undo.mover.index()];
            *score = score
                .checked_sub(1)
                .expect("undoing a scoring action with no score recorded");
        }

        let handle = PieceRef::new(undo.mover, action.piece);
        if let Some(to) = action.to {
            assert_eq!(
                self.cells[to.index()],
                Some(handle),
                "undo of `{action}`: mover not found on cell {to}"
            );
            self.cells[to.index()] = None;
        }
        if let Some(from) = action.from {
            assert!(
                self.cells[from.index()].is_none(),
                "undo of `{action}`: source cell {from} is occupied"
            );
            self.cells[from.index()] = Some(handle);
        }

        let player = &mut self.players[undo.mover.index()];
        match (action.from, action.to) {
            (None, Some(_)) => player.off_board += 1,
            (Some(_), None) => player.off_board -= 1,
            _ => {}
        }
        player.pieces[action.piece as usize].position = action.from;

        if let Some(defender) = undo.captured {
            let cell = action.to.expect("captured piece without a target cell");
            self.cells[cell.index()] = Some(defender);
            let owner = &mut self.players[defender.side.index()];
            owner.pieces[defender.id as usize].position = Some(cell);
            owner.off_board -= 1;
        }

        self.turn = undo.mover;
    }

    /// Commit an action for the side to move.
    ///
    /// Rejects actions the generator does not currently offer.
    pub fn apply_permanent(&mut self, action: Action) -> Result<()> {
        let side = self.turn;
        let offered = self
            .current_player_actions()
            .iter()
            .flatten()
            .any(|a| *a == action);
        if !offered {
            return Err(GameError::InvalidAction { action, side });
        }

        self.apply(action);
        if cfg!(debug_assertions) {
            self.assert_consistent();
        }
        trace!(%side, %action, scores = ?self.scores(), "action committed");
        Ok(())
    }

    /// Commit a pass. Only legal when the side to move has no action.
    pub fn pass_turn(&mut self) -> Result<()> {
        let side = self.turn;
        if self.has_actions(side) {
            return Err(GameError::IllegalPass { side });
        }
        self.pass();
        trace!(%side, "turn passed");
        Ok(())
    }

    // ========== Terminal & Evaluation ==========

    /// Check both ways a line of play ends.
    pub fn terminal_test(&self) -> Terminal {
        Terminal {
            gridlock: !self.has_actions(self.turn),
            score_reached: self.winner().is_some(),
        }
    }

    /// Side whose score reached the winning score, if any.
    pub fn winner(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.score(side) >= self.winning_score)
    }

    /// Heuristic value: positive favors Max, negative favors Min.
    ///
    /// `score difference + w * (progress(Max) - progress(Min)) / (ROWS + 1)`,
    /// where progress sums the rows each side's on-board pieces have
    /// advanced. A piece one step from scoring is worth less than a point.
    pub fn eval_state(&self) -> f64 {
        let score_diff = self.score(Side::Max) as f64 - self.score(Side::Min) as f64;
        let progress_diff = self.progress(Side::Max) as f64 - self.progress(Side::Min) as f64;
        score_diff + self.params.eval_weight * progress_diff / (ROWS as f64 + 1.0)
    }

    fn progress(&self, side: Side) -> u32 {
        self.player(side)
            .pieces()
            .iter()
            .filter_map(|piece| piece.position)
            .map(|cell| side.progress(cell.row()) as u32)
            .sum()
    }

    // ========== Display ==========

    /// Signed occupancy grid for display.
    pub fn snapshot(&self) -> Snapshot {
        let mut grid = [[0i8; COLS as usize]; ROWS as usize];
        for cell in Cell::all() {
            if let Some(handle) = self.occupant(cell) {
                grid[cell.row() as usize][cell.col() as usize] =
                    (1 + handle.id as i8) * handle.side.id();
            }
        }
        grid
    }

    /// Check the cell/piece cross references and reserve counts.
    ///
    /// Panics with a diagnostic on the first inconsistency.
    pub fn assert_consistent(&self) {
        for cell in Cell::all() {
            if let Some(handle) = self.occupant(cell) {
                let piece = self.piece(handle);
                assert_eq!(
                    piece.position,
                    Some(cell),
                    "cell {cell} holds {handle:?} but the piece is at {:?}",
                    piece.position
                );
            }
        }
        for player in &self.players {
            for piece in player.pieces() {
                if let Some(cell) = piece.position {
                    assert_eq!(
                        self.occupant(cell),
                        Some(piece.handle()),
                        "{:?} claims cell {cell} but the cell disagrees",
                        piece.handle()
                    );
                }
            }
            assert_eq!(
                player.off_board() as usize + player.on_board(),
                PIECES_PER_PLAYER,
                "{} reserve count out of sync",
                player.side()
            );
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(false, false, DEFAULT_WINNING_SCORE, Params::default())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.snapshot() {
            let line: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { "  .".to_string() } else { format!("{v:>3}") })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        write!(
            f,
            "score Min {} : {} Max, {} to move",
            self.score(Side::Min),
            self.score(Side::Max),
            self.turn
        )
    }
}
