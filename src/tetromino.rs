//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes with their rotations using SRS (Super Rotation System).
//! Offsets are (row, col) with row increasing downward, matching the board.

use serde::{Deserialize, Serialize};

/// The 7 tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

/// Occupied offsets for one orientation
pub type Shape = [(i32, i32); 4];

/// Geometry table indexed by `[kind][rotation]`.
///
/// Rotation order is North, East, South, West.
const SHAPES: [[Shape; 4]; 7] = [
    // I
    [
        [(0, -1), (0, 0), (0, 1), (0, 2)],
        [(-1, 1), (0, 1), (1, 1), (2, 1)],
        [(1, -1), (1, 0), (1, 1), (1, 2)],
        [(-1, 0), (0, 0), (1, 0), (2, 0)],
    ],
    // O doesn't rotate
    [
        [(0, 0), (0, 1), (1, 0), (1, 1)],
        [(0, 0), (0, 1), (1, 0), (1, 1)],
        [(0, 0), (0, 1), (1, 0), (1, 1)],
        [(0, 0), (0, 1), (1, 0), (1, 1)],
    ],
    // T
    [
        [(0, -1), (0, 0), (0, 1), (-1, 0)],
        [(-1, 0), (0, 0), (1, 0), (0, 1)],
        [(0, -1), (0, 0), (0, 1), (1, 0)],
        [(-1, 0), (0, 0), (1, 0), (0, -1)],
    ],
    // S
    // North: .SS    East: S.    South: ...   West: S.
    //        SS.          SS           .SS        SS
    //                     .S           SS.        .S
    [
        [(-1, 0), (-1, 1), (0, -1), (0, 0)],
        [(-1, 0), (0, 0), (0, 1), (1, 1)],
        [(0, 0), (0, 1), (1, -1), (1, 0)],
        [(-1, -1), (0, -1), (0, 0), (1, 0)],
    ],
    // Z
    [
        [(-1, -1), (-1, 0), (0, 0), (0, 1)],
        [(-1, 1), (0, 0), (0, 1), (1, 0)],
        [(0, -1), (0, 0), (1, 0), (1, 1)],
        [(-1, 0), (0, -1), (0, 0), (1, -1)],
    ],
    // J
    [
        [(-1, -1), (0, -1), (0, 0), (0, 1)],
        [(-1, 0), (-1, 1), (0, 0), (1, 0)],
        [(0, -1), (0, 0), (0, 1), (1, 1)],
        [(-1, 0), (0, 0), (1, 0), (1, -1)],
    ],
    // L
    [
        [(-1, 1), (0, -1), (0, 0), (0, 1)],
        [(-1, 0), (0, 0), (1, 0), (1, 1)],
        [(0, -1), (0, 0), (0, 1), (1, -1)],
        [(-1, -1), (-1, 0), (0, 0), (1, 0)],
    ],
];

impl PieceKind {
    /// All kinds, in table order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position of this kind in [`PieceKind::ALL`] and the geometry table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display color as RGB, for the renderer's lookup
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (0, 255, 255),
            PieceKind::O => (255, 255, 0),
            PieceKind::T => (160, 32, 240),
            PieceKind::S => (0, 255, 100),
            PieceKind::Z => (255, 50, 50),
            PieceKind::J => (0, 100, 255),
            PieceKind::L => (255, 165, 0),
        }
    }

    /// Get the shape offsets for this tetromino at a given rotation
    pub fn shape(self, rotation: Rotation) -> Shape {
        SHAPES[self.index()][rotation.index()]
    }

    /// Spawn anchor (row, col) - pieces spawn at top center, inside rows 0-1
    pub fn spawn_position(self) -> (i32, i32) {
        match self {
            PieceKind::I | PieceKind::O => (0, 4),
            _ => (1, 4),
        }
    }
}

/// Rotation states (using SRS naming convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    const ORDER: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotation index 0-3
    pub fn index(self) -> usize {
        self as usize
    }

    /// Rotation state for an index, taken mod 4
    pub fn from_index(index: usize) -> Rotation {
        Self::ORDER[index % 4]
    }

    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(self) -> Rotation {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(self) -> Rotation {
        Self::from_index(self.index() + 3)
    }

    pub fn turned(self, direction: RotationDirection) -> Rotation {
        match direction {
            RotationDirection::Clockwise => self.cw(),
            RotationDirection::CounterClockwise => self.ccw(),
        }
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_orientation_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for rotation in Rotation::ORDER {
                let cells: HashSet<_> = kind.shape(rotation).into_iter().collect();
                assert_eq!(cells.len(), 4, "{kind:?} {rotation:?}");
            }
        }
    }

    #[test]
    fn test_cells_are_edge_connected() {
        for kind in PieceKind::ALL {
            for rotation in Rotation::ORDER {
                let shape = kind.shape(rotation);
                for &(r, c) in &shape {
                    let touching = shape
                        .iter()
                        .filter(|&&(r2, c2)| (r - r2).abs() + (c - c2).abs() == 1)
                        .count();
                    assert!(touching >= 1, "{kind:?} {rotation:?} has a loose cell");
                }
            }
        }
    }

    #[test]
    fn test_spawn_cells_inside_top_rows() {
        for kind in PieceKind::ALL {
            let (row, col) = kind.spawn_position();
            for (dr, dc) in kind.shape(Rotation::North) {
                assert!((0..2).contains(&(row + dr)), "{kind:?}");
                assert!((0..10).contains(&(col + dc)), "{kind:?}");
            }
        }
    }

    #[test]
    fn test_rotation_cycle() {
        let mut rotation = Rotation::North;
        for _ in 0..4 {
            assert_eq!(rotation.cw().ccw(), rotation);
            rotation = rotation.cw();
        }
        assert_eq!(rotation, Rotation::North);
        assert_eq!(Rotation::North.ccw(), Rotation::West);
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: HashSet<_> = PieceKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), 7);
    }
}
