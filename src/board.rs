//! Game board representation and collision detection
//!
//! `is_valid` is the single collision test. Movement, rotation kicks, spawn
//! checks and ghost projection all go through it.

use serde::{Deserialize, Serialize};

use crate::piece::Piece;
use crate::srs::get_wall_kicks;
use crate::tetromino::{PieceKind, RotationDirection};

/// Standard Tetris board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled by a kind (for color lookup)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// One board row, left to right
pub type Row = [Cell; BOARD_WIDTH];

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_HEIGHT && col < BOARD_WIDTH).then_some((row, col))
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        Self::index(row, col).map(|(r, c)| self.cells[r][c])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some((r, c)) => {
                self.cells[r][c] = cell;
                true
            }
            None => false,
        }
    }

    /// True iff every cell is inside the grid and unoccupied
    pub fn is_valid(&self, cells: &[(i32, i32)]) -> bool {
        cells
            .iter()
            .all(|&(row, col)| matches!(self.get(row, col), Some(Cell::Empty)))
    }

    /// Mark cells as occupied by `kind`.
    ///
    /// The caller must have checked the cells with [`Board::is_valid`];
    /// nothing is re-checked here.
    pub fn commit(&mut self, cells: &[(i32, i32)], kind: PieceKind) {
        for &(row, col) in cells {
            self.set(row, col, Cell::Filled(kind));
        }
    }

    /// Remove every full row and shift the rows above it down.
    ///
    /// Returns the pre-clear indices of the removed rows, top to bottom.
    /// Empty rows are inserted at the top so the height never changes.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = (0..BOARD_HEIGHT)
            .filter(|&row| self.is_row_full(row))
            .collect();
        if cleared.is_empty() {
            return cleared;
        }

        // Compact bottom-up; `write` never passes `read`
        let mut write = BOARD_HEIGHT;
        for read in (0..BOARD_HEIGHT).rev() {
            if !self.is_row_full(read) {
                write -= 1;
                self.cells[write] = self.cells[read];
            }
        }
        for row in &mut self.cells[..write] {
            *row = [Cell::Empty; BOARD_WIDTH];
        }

        cleared
    }

    /// Check if a row is completely filled
    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(Cell::is_filled)
    }

    /// Furthest anchor straight below `piece` that is still valid
    pub fn ghost_position(&self, piece: &Piece) -> (i32, i32) {
        let mut anchor = piece.anchor();
        loop {
            let below = (anchor.0 + 1, anchor.1);
            if !self.is_valid(&piece.cells_at(piece.rotation, below)) {
                return anchor;
            }
            anchor = below;
        }
    }

    /// The piece moved by (d_row, d_col), if that placement is valid
    pub fn try_translate(&self, piece: &Piece, d_row: i32, d_col: i32) -> Option<Piece> {
        let anchor = piece.translate(d_row, d_col);
        self.is_valid(&piece.cells_at(piece.rotation, anchor))
            .then(|| piece.placed(piece.rotation, anchor))
    }

    /// The piece rotated with the first wall kick that fits, if any
    pub fn try_rotate(&self, piece: &Piece, direction: RotationDirection) -> Option<Piece> {
        let rotation = piece.rotate(direction);
        get_wall_kicks(piece.kind, piece.rotation, direction)
            .into_iter()
            .map(|(d_row, d_col)| piece.translate(d_row, d_col))
            .find(|&anchor| self.is_valid(&piece.cells_at(rotation, anchor)))
            .map(|anchor| piece.placed(rotation, anchor))
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }
}
