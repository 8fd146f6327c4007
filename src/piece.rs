//! Active falling piece
//!
//! A `Piece` only proposes geometry. Whether a proposal is legal is decided by
//! [`Board::is_valid`](crate::board::Board::is_valid).

use serde::{Deserialize, Serialize};

use crate::tetromino::{PieceKind, Rotation, RotationDirection};

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// The kind of tetromino
    pub kind: PieceKind,
    /// Current rotation state
    pub rotation: Rotation,
    /// Position (row, col) of the piece's pivot point
    /// Row 0 is the top row, increases downward
    pub row: i32,
    pub col: i32,
}

impl Piece {
    /// Create a new piece at spawn position and orientation
    pub fn new(kind: PieceKind) -> Self {
        let (row, col) = kind.spawn_position();
        Self {
            kind,
            rotation: Rotation::North,
            row,
            col,
        }
    }

    /// Absolute cells for a hypothetical rotation and anchor
    pub fn cells_at(&self, rotation: Rotation, (row, col): (i32, i32)) -> [(i32, i32); 4] {
        self.kind
            .shape(rotation)
            .map(|(dr, dc)| (row + dr, col + dc))
    }

    /// Get the absolute positions of all 4 blocks
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.cells_at(self.rotation, self.anchor())
    }

    pub fn anchor(&self) -> (i32, i32) {
        (self.row, self.col)
    }

    /// Candidate rotation state; nothing is checked here
    pub fn rotate(&self, direction: RotationDirection) -> Rotation {
        self.rotation.turned(direction)
    }

    /// Candidate anchor shifted by (d_row, d_col); nothing is checked here
    pub fn translate(&self, d_row: i32, d_col: i32) -> (i32, i32) {
        (self.row + d_row, self.col + d_col)
    }

    /// Copy of this piece placed at another rotation and anchor
    pub fn placed(&self, rotation: Rotation, (row, col): (i32, i32)) -> Piece {
        Piece {
            kind: self.kind,
            rotation,
            row,
            col,
        }
    }
}
