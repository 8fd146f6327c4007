//! Placement bot used by the simulator binary
//!
//! Tries every reachable (rotation, column) for the active piece, drops it,
//! scores the resulting stack and turns the best landing into [`Action`]s.
//! Only moves the game itself would accept are considered, so replaying the
//! plan against the same board reaches the same landing.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::game::Action;
use crate::piece::Piece;
use crate::tetromino::RotationDirection;

/// Weights for the stack evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub aggregate_height: f64,
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.51,
            lines: 0.76,
            holes: -0.36,
            bumpiness: -0.18,
        }
    }
}

/// A candidate landing for the active piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Clockwise turns from the current orientation
    pub turns: u8,
    /// Column shift after turning, negative is left
    pub shift: i32,
    /// Where the piece comes to rest
    pub landing: Piece,
    pub score: f64,
}

impl Placement {
    /// Turns, then shifts, then a hard drop
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::Rotate; self.turns as usize];
        let step = if self.shift < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        };
        actions.extend(std::iter::repeat_n(step, self.shift.unsigned_abs() as usize));
        actions.push(Action::HardDrop);
        actions
    }
}

#[derive(Debug, Clone, Default)]
pub struct Autoplay {
    weights: Weights,
}

impl Autoplay {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Best landing for `piece` on `board`, if the piece can be placed at all
    pub fn best_placement(&self, board: &Board, piece: &Piece) -> Option<Placement> {
        let mut best: Option<Placement> = None;
        let mut turned = *piece;

        for turns in 0..4u8 {
            if turns > 0 {
                match board.try_rotate(&turned, RotationDirection::Clockwise) {
                    Some(next) => turned = next,
                    None => break,
                }
            }

            for (shift, shifted) in Self::slides(board, &turned) {
                let (row, col) = board.ghost_position(&shifted);
                let landing = shifted.placed(shifted.rotation, (row, col));
                let score = self.evaluate(board, &landing);
                if best.is_none_or(|b| score > b.score) {
                    best = Some(Placement {
                        turns,
                        shift,
                        landing,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Actions that play the best landing, or a bare hard drop as a fallback
    pub fn plan(&self, board: &Board, piece: &Piece) -> Vec<Action> {
        self.best_placement(board, piece)
            .map(|p| p.actions())
            .unwrap_or_else(|| vec![Action::HardDrop])
    }

    /// Every column reachable by repeated single steps, with its shift
    fn slides(board: &Board, piece: &Piece) -> Vec<(i32, Piece)> {
        let mut out = vec![(0, *piece)];
        for d_col in [-1, 1] {
            let mut current = *piece;
            let mut shift = 0;
            while let Some(next) = board.try_translate(&current, 0, d_col) {
                shift += d_col;
                current = next;
                out.push((shift, current));
            }
        }
        out
    }

    fn evaluate(&self, board: &Board, landing: &Piece) -> f64 {
        let mut after = board.clone();
        after.commit(&landing.cells(), landing.kind);
        let lines = after.clear_full_rows().len();
        let features = Features::of(&after);

        self.weights.aggregate_height * features.aggregate_height as f64
            + self.weights.lines * lines as f64
            + self.weights.holes * features.holes as f64
            + self.weights.bumpiness * features.bumpiness as f64
    }
}

/// Stack shape measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub aggregate_height: u32,
    /// Empty cells with a filled cell somewhere above in the same column
    pub holes: u32,
    pub bumpiness: u32,
}

impl Features {
    pub fn of(board: &Board) -> Self {
        let rows = board.rows();
        let mut heights = [0u32; BOARD_WIDTH];
        let mut holes = 0;

        for (col, height) in heights.iter_mut().enumerate() {
            let top = (0..BOARD_HEIGHT).find(|&row| rows[row][col].is_filled());
            if let Some(top) = top {
                *height = (BOARD_HEIGHT - top) as u32;
                holes += (top..BOARD_HEIGHT)
                    .filter(|&row| rows[row][col].is_empty())
                    .count() as u32;
            }
        }

        Self {
            aggregate_height: heights.iter().sum(),
            holes,
            bumpiness: heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum(),
        }
    }
}
