//! Super Rotation System (SRS) wall kick data
//!
//! SRS defines the wall kicks attempted when rotating a piece.
//! If a rotation would cause collision, these offsets are tried in order.
//! Offsets are (row, col) with row increasing downward.

use crate::tetromino::{PieceKind, Rotation, RotationDirection};

/// Trial offsets for one rotation attempt
pub type Kicks = [(i32, i32); 5];

/// Get wall kick offsets for a rotation attempt
/// Returns 5 (row_offset, col_offset) pairs to try, identity first
pub fn get_wall_kicks(kind: PieceKind, from: Rotation, direction: RotationDirection) -> Kicks {
    match kind {
        PieceKind::O => [(0, 0); 5],
        PieceKind::I => i_piece_kicks(from, direction),
        _ => jlstz_kicks(from, direction),
    }
}

/// Wall kicks for J, L, S, T, Z pieces
fn jlstz_kicks(from: Rotation, direction: RotationDirection) -> Kicks {
    use Rotation::*;
    use RotationDirection::*;

    match (from, direction) {
        // 0→R
        (North, Clockwise) => [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        // R→0
        (East, CounterClockwise) => [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
        // R→2
        (East, Clockwise) => [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
        // 2→R
        (South, CounterClockwise) => [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
        // 2→L
        (South, Clockwise) => [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
        // L→2
        (West, CounterClockwise) => [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        // L→0
        (West, Clockwise) => [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
        // 0→L
        (North, CounterClockwise) => [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
    }
}

/// Wall kicks for I piece (different from other pieces)
fn i_piece_kicks(from: Rotation, direction: RotationDirection) -> Kicks {
    use Rotation::*;
    use RotationDirection::*;

    match (from, direction) {
        (North, Clockwise) => [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
        (East, CounterClockwise) => [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
        (East, Clockwise) => [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
        (South, CounterClockwise) => [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
        (South, Clockwise) => [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
        (West, CounterClockwise) => [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
        (West, Clockwise) => [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
        (North, CounterClockwise) => [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROTATIONS: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];
    const DIRECTIONS: [RotationDirection; 2] = [
        RotationDirection::Clockwise,
        RotationDirection::CounterClockwise,
    ];

    #[test]
    fn test_first_kick_is_identity() {
        for kind in PieceKind::ALL {
            for from in ROTATIONS {
                for dir in DIRECTIONS {
                    let kicks = get_wall_kicks(kind, from, dir);
                    assert_eq!(kicks[0], (0, 0));
                }
            }
        }
    }

    #[test]
    fn test_reverse_rotation_mirrors_kicks() {
        // Undoing a rotation tries the negated offsets of the forward rotation
        for kind in PieceKind::ALL {
            for from in ROTATIONS {
                let forward = get_wall_kicks(kind, from, RotationDirection::Clockwise);
                let back = get_wall_kicks(kind, from.cw(), RotationDirection::CounterClockwise);
                for (f, b) in forward.iter().zip(back.iter()) {
                    assert_eq!((f.0 + b.0, f.1 + b.1), (0, 0), "{kind:?} {from:?}");
                }
            }
        }
    }
}
