//! Pieces and per-piece move generation.

use crate::{Action, ActionKind, Board, Cell, PieceRef, Side, COLS};

/// Forward-diagonal target columns, indexed by source column.
///
/// ```text
///   col 0 -> col 1
///   col 1 -> col 0, col 2
///   col 2 -> col 1
/// ```
///
/// Both sides share the table; the target row comes from [`Side::advance`].
const DIAGONAL_COLUMNS: [&[u8]; COLS as usize] = [&[1], &[0, 2], &[1]];

/// One of a side's four tokens.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub owner: Side,
    pub id: u8,
    /// Cell the piece stands on, or None while in reserve.
    pub position: Option<Cell>,
}

impl Piece {
    /// Create a piece in reserve.
    #[inline]
    pub const fn new(owner: Side, id: u8) -> Piece {
        Piece {
            owner,
            id,
            position: None,
        }
    }

    #[inline]
    pub fn on_board(&self) -> bool {
        self.position.is_some()
    }

    /// Handle stored in the board cell this piece occupies.
    #[inline]
    pub fn handle(&self) -> PieceRef {
        PieceRef::new(self.owner, self.id)
    }

    /// Generate every action this piece can take on `board`.
    ///
    /// - In reserve: one `Insert` per empty home-row cell.
    /// - On the goal row: only the scoring exit.
    /// - Otherwise: forward diagonals into empty cells, then `Attack` and
    ///   `Jump` when an opponent piece stands directly ahead.
    pub fn actions(&self, board: &Board) -> Vec<Action> {
        let Some(pos) = self.position else {
            return self.insert_actions(board);
        };

        if pos.row() == self.owner.goal_row() {
            return vec![Action::new(Some(pos), None, ActionKind::Diag, self.id, true)];
        }

        let mut actions = self.diag_actions(board, pos);

        if let Some(front) = pos.ahead(self.owner) {
            let opponent_ahead = board
                .occupant(front)
                .is_some_and(|other| other.side != self.owner);
            if opponent_ahead {
                actions.push(Action::new(
                    Some(pos),
                    Some(front),
                    ActionKind::Attack,
                    self.id,
                    false,
                ));
                if let Some(jump) = self.jump_action(board, pos, front) {
                    actions.push(jump);
                }
            }
        }

        actions
    }

    fn insert_actions(&self, board: &Board) -> Vec<Action> {
        Cell::row_cells(self.owner.home_row())
            .filter(|&cell| board.is_empty(cell))
            .map(|cell| Action::new(None, Some(cell), ActionKind::Insert, self.id, false))
            .collect()
    }

    fn diag_actions(&self, board: &Board, pos: Cell) -> Vec<Action> {
        let Some(row) = self.owner.advance(pos.row()) else {
            return Vec::new();
        };
        DIAGONAL_COLUMNS[pos.col() as usize]
            .iter()
            .map(|&col| Cell::from_row_col(row, col))
            .filter(|&cell| board.is_empty(cell))
            .map(|cell| Action::new(Some(pos), Some(cell), ActionKind::Diag, self.id, false))
            .collect()
    }

    /// Leap over the opponent piece at `front`.
    ///
    /// Scans forward past `front`: opponent pieces extend the scan, the first
    /// empty cell is the landing square, a friendly piece blocks the jump and
    /// running off the far edge exits the board with a point.
    fn jump_action(&self, board: &Board, pos: Cell, front: Cell) -> Option<Action> {
        let exit = Action::new(Some(pos), None, ActionKind::Jump, self.id, true);

        if front.row() == self.owner.goal_row() {
            return Some(exit);
        }

        let mut next = front.ahead(self.owner);
        while let Some(cell) = next {
            match board.occupant(cell) {
                None => {
                    return Some(Action::new(
                        Some(pos),
                        Some(cell),
                        ActionKind::Jump,
                        self.id,
                        false,
                    ))
                }
                Some(other) if other.side == self.owner => return None,
                Some(_) => next = cell.ahead(self.owner),
            }
        }
        Some(exit)
    }
}
