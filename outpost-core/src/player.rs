//! Players: a side's piece roster and reserve count.

use crate::{Action, Board, Piece, Side};

/// Pieces owned by each side.
pub const PIECES_PER_PLAYER: usize = 4;

/// A side's roster.
///
/// Invariant: `off_board + on_board() == PIECES_PER_PLAYER`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Player {
    side: Side,
    is_human: bool,
    pub(crate) pieces: [Piece; PIECES_PER_PLAYER],
    pub(crate) off_board: u8,
}

impl Player {
    /// Create a player with every piece in reserve.
    pub fn new(side: Side, is_human: bool) -> Player {
        Player {
            side,
            is_human,
            pieces: [0, 1, 2, 3].map(|id| Piece::new(side, id)),
            off_board: PIECES_PER_PLAYER as u8,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn is_human(&self) -> bool {
        self.is_human
    }

    #[inline]
    pub fn pieces(&self) -> &[Piece; PIECES_PER_PLAYER] {
        &self.pieces
    }

    /// Get a piece by id (0-3).
    #[inline]
    pub fn piece(&self, id: u8) -> &Piece {
        &self.pieces[id as usize]
    }

    /// Pieces currently in reserve.
    #[inline]
    pub fn off_board(&self) -> u8 {
        self.off_board
    }

    /// Pieces currently on the grid.
    pub fn on_board(&self) -> usize {
        self.pieces.iter().filter(|p| p.on_board()).count()
    }

    /// Collect actions per piece, in piece-id order, omitting pieces with
    /// none.
    ///
    /// Reserve pieces are interchangeable, so only the lowest-id reserve
    /// piece contributes insertions.
    pub fn actions(&self, board: &Board) -> Vec<Vec<Action>> {
        let mut reserve_seen = false;
        let mut all_actions = Vec::with_capacity(PIECES_PER_PLAYER);

        for piece in &self.pieces {
            if !piece.on_board() {
                if reserve_seen {
                    continue;
                }
                reserve_seen = true;
            }
            let actions = piece.actions(board);
            if !actions.is_empty() {
                all_actions.push(actions);
            }
        }
        all_actions
    }

    /// Whether any piece has at least one action.
    pub fn has_actions(&self, board: &Board) -> bool {
        self.pieces.iter().any(|p| !p.actions(board).is_empty())
    }
}
