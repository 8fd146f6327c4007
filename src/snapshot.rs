//! Owned copy of the query surface, for readers on another thread

use serde::Serialize;

use crate::board::{BOARD_HEIGHT, Board, Row};
use crate::mode::Mode;
use crate::piece::Piece;
use crate::score::ScoreSnapshot;
use crate::state::GameState;
use crate::tetromino::PieceKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    /// Rows top to bottom
    pub board: [Row; BOARD_HEIGHT],
    pub active: Option<Piece>,
    pub ghost: Option<Piece>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub preview: Vec<PieceKind>,
    pub score: Option<ScoreSnapshot>,
}

impl Snapshot {
    pub fn capture(mode: Mode, state: Option<&GameState>) -> Self {
        match state {
            Some(state) => Self {
                mode,
                board: *state.board().rows(),
                active: state.current().copied(),
                ghost: state.ghost(),
                hold: state.held(),
                can_hold: state.can_hold(),
                preview: state.preview().to_vec(),
                score: Some(state.score().snapshot()),
            },
            None => Self {
                mode,
                board: *Board::new().rows(),
                active: None,
                ghost: None,
                hold: None,
                can_hold: false,
                preview: Vec::new(),
                score: None,
            },
        }
    }

    /// Whether a cell is occupied by the stack (the active piece is not included)
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.board
            .get(row)
            .and_then(|cells| cells.get(col))
            .is_some_and(|cell| cell.is_filled())
    }
}
