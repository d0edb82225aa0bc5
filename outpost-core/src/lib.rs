//! Outpost game logic: a 4×3 capture/race game with an alpha-beta opponent.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major, 4 rows × 3 columns):
//!   row 0:   0  1  2    <- Min home row (Max scores past it)
//!   row 1:   3  4  5
//!   row 2:   6  7  8
//!   row 3:   9 10 11    <- Max home row (Min scores past it)
//! ```
//!
//! Min (id −1) moves down the board, Max (id +1) moves up. Each side owns four
//! pieces that start in reserve.
//!
//! # Action Encoding
//!
//! ```text
//! (from, to, kind, piece, scores)
//!   from = None  -> insertion from the reserve onto the home row
//!   to   = None  -> the piece leaves over the far edge and scores
//! ```
//!
//! # Undo
//!
//! [`Board::apply`] returns an [`Undo`] token describing the mover and any
//! captured piece. Passing it back to [`Board::undo`] restores the exact
//! previous state, which lets the search mutate a single board in place.

use std::fmt;

use serde::{Deserialize, Serialize};

mod board;
mod error;
mod params;
mod piece;
mod player;
mod search;

pub use board::{Board, Snapshot, Terminal, Undo, DEFAULT_WINNING_SCORE};
pub use error::{GameError, Result};
pub use params::{GridlockRule, Params};
pub use piece::Piece;
pub use player::{Player, PIECES_PER_PLAYER};
pub use search::{order_actions, Evaluation, SearchStats, WIN_VALUE};

/// Number of rows on the board.
pub const ROWS: u8 = 4;
/// Number of columns on the board.
pub const COLS: u8 = 3;
/// Number of cells on the board.
pub const CELLS: usize = (ROWS * COLS) as usize;

/// One of the two players.
///
/// The discriminant is the player id used for signed display and for the
/// evaluation sign convention: Max maximizes, Min minimizes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Side {
    Min = -1,
    Max = 1,
}

impl Side {
    /// Both sides, in turn order.
    pub const BOTH: [Side; 2] = [Side::Min, Side::Max];

    /// Get the opponent side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Min => Side::Max,
            Side::Max => Side::Min,
        }
    }

    /// Player id (−1 or +1).
    #[inline]
    pub fn id(self) -> i8 {
        self as i8
    }

    /// Array index for per-side storage (Min = 0, Max = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Min => 0,
            Side::Max => 1,
        }
    }

    /// Row where this side inserts its pieces.
    #[inline]
    pub fn home_row(self) -> u8 {
        match self {
            Side::Min => 0,
            Side::Max => ROWS - 1,
        }
    }

    /// Row this side scores from (the opponent's home row).
    #[inline]
    pub fn goal_row(self) -> u8 {
        self.opponent().home_row()
    }

    /// Row delta of a forward step.
    #[inline]
    pub fn forward(self) -> i8 {
        match self {
            Side::Min => 1,
            Side::Max => -1,
        }
    }

    /// The row one step forward of `row`, or None past the far edge.
    #[inline]
    pub fn advance(self, row: u8) -> Option<u8> {
        let next = row as i8 + self.forward();
        if (0..ROWS as i8).contains(&next) {
            Some(next as u8)
        } else {
            None
        }
    }

    /// Rows advanced by a piece standing on `row`, counting the insertion
    /// onto the home row as the first.
    #[inline]
    pub fn progress(self, row: u8) -> u8 {
        match self {
            Side::Min => row + 1,
            Side::Max => ROWS - row,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Min => write!(f, "Min(-1)"),
            Side::Max => write!(f, "Max(+1)"),
        }
    }
}

/// Cell on the 4×3 board (0-11), see the module docs for the layout.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell(pub u8);

impl Cell {
    /// Create a cell from row (0-3) and column (0-2).
    #[inline]
    pub fn from_row_col(row: u8, col: u8) -> Cell {
        debug_assert!(row < ROWS && col < COLS);
        Cell(row * COLS + col)
    }

    #[inline]
    pub fn row(self) -> u8 {
        self.0 / COLS
    }

    #[inline]
    pub fn col(self) -> u8 {
        self.0 % COLS
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The column-aligned cell one row ahead for `side`.
    #[inline]
    pub fn ahead(self, side: Side) -> Option<Cell> {
        side.advance(self.row()).map(|row| Cell::from_row_col(row, self.col()))
    }

    /// Iterate over all 12 cells.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELLS as u8).map(Cell)
    }

    /// Iterate over the cells of one row.
    pub fn row_cells(row: u8) -> impl Iterator<Item = Cell> {
        (0..COLS).map(move |col| Cell::from_row_col(row, col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a piece: owner plus index into the owner's piece array.
///
/// Cells hold handles instead of pieces; [`Board::piece`] resolves them.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct PieceRef {
    pub side: Side,
    pub id: u8,
}

impl PieceRef {
    #[inline]
    pub const fn new(side: Side, id: u8) -> PieceRef {
        PieceRef { side, id }
    }
}

/// Kind of action. The declaration order is the move-ordering order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    Insert,
    Diag,
    Attack,
    Jump,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Insert => "Insert",
            ActionKind::Diag => "Diag",
            ActionKind::Attack => "Attack",
            ActionKind::Jump => "Jump",
        };
        f.write_str(name)
    }
}

/// A single ply. Actions are produced by move generation and never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Action {
    pub from: Option<Cell>,
    pub to: Option<Cell>,
    pub kind: ActionKind,
    /// Id of the moving piece within its owner's roster.
    pub piece: u8,
    /// Whether applying this action scores a point for the mover.
    pub scores: bool,
}

impl Action {
    #[inline]
    pub const fn new(
        from: Option<Cell>,
        to: Option<Cell>,
        kind: ActionKind,
        piece: u8,
        scores: bool,
    ) -> Action {
        Action {
            from,
            to,
            kind,
            piece,
            scores,
        }
    }

    /// Sort key used by move ordering: kind first, then the action tuple.
    #[inline]
    pub fn order_key(&self) -> (ActionKind, Option<Cell>, Option<Cell>, u8, bool) {
        (self.kind, self.from, self.to, self.piece, self.scores)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = self.from.map_or("reserve".to_string(), |c| c.to_string());
        let to = self.to.map_or("off".to_string(), |c| c.to_string());
        write!(f, "{} piece: {} from {} to {}", self.kind, self.piece + 1, from, to)?;
        if self.scores {
            write!(f, " (scores)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Min.opponent(), Side::Max);
        assert_eq!(Side::Max.opponent(), Side::Min);
    }

    #[test]
    fn test_side_ids_and_indices() {
        assert_eq!(Side::Min.id(), -1);
        assert_eq!(Side::Max.id(), 1);
        assert_eq!(Side::Min.index(), 0);
        assert_eq!(Side::Max.index(), 1);
    }

    #[test]
    fn test_side_rows() {
        assert_eq!(Side::Min.home_row(), 0);
        assert_eq!(Side::Min.goal_row(), 3);
        assert_eq!(Side::Max.home_row(), 3);
        assert_eq!(Side::Max.goal_row(), 0);
    }

    #[test]
    fn test_side_advance_stops_at_edge() {
        assert_eq!(Side::Min.advance(0), Some(1));
        assert_eq!(Side::Min.advance(3), None);
        assert_eq!(Side::Max.advance(3), Some(2));
        assert_eq!(Side::Max.advance(0), None);
    }

    #[test]
    fn test_side_progress() {
        // Freshly inserted pieces count one row of progress
        assert_eq!(Side::Min.progress(0), 1);
        assert_eq!(Side::Max.progress(3), 1);
        // Goal row is four rows in
        assert_eq!(Side::Min.progress(3), 4);
        assert_eq!(Side::Max.progress(0), 4);
    }

    #[test]
    fn test_cell_row_col() {
        for cell in Cell::all() {
            assert_eq!(Cell::from_row_col(cell.row(), cell.col()), cell);
        }
        assert_eq!(Cell(7).row(), 2);
        assert_eq!(Cell(7).col(), 1);
        assert_eq!(Cell::all().count(), 12);
    }

    #[test]
    fn test_cell_ahead() {
        assert_eq!(Cell(1).ahead(Side::Min), Some(Cell(4)));
        assert_eq!(Cell(10).ahead(Side::Min), None);
        assert_eq!(Cell(10).ahead(Side::Max), Some(Cell(7)));
        assert_eq!(Cell(2).ahead(Side::Max), None);
    }

    #[test]
    fn test_row_cells() {
        let home: Vec<_> = Cell::row_cells(3).collect();
        assert_eq!(home, vec![Cell(9), Cell(10), Cell(11)]);
    }

    #[test]
    fn test_action_kind_order() {
        assert!(ActionKind::Insert < ActionKind::Diag);
        assert!(ActionKind::Diag < ActionKind::Attack);
        assert!(ActionKind::Attack < ActionKind::Jump);
    }

    #[test]
    fn test_action_display() {
        let action = Action::new(Some(Cell(9)), None, ActionKind::Diag, 2, true);
        assert_eq!(action.to_string(), "Diag piece: 3 from 9 to off (scores)");

        let insert = Action::new(None, Some(Cell(1)), ActionKind::Insert, 0, false);
        assert_eq!(insert.to_string(), "Insert piece: 1 from reserve to 1");
    }

    #[test]
    fn test_action_serializes() {
        let action = Action::new(Some(Cell(4)), Some(Cell(7)), ActionKind::Jump, 1, false);
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
