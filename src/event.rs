//! Effect events emitted for renderers, audio and score stores
//!
//! Consumers read these; they never feed back into the game.

use std::mem::{Discriminant, discriminant};

use serde::Serialize;

use crate::mode::Mode;
use crate::tetromino::{PieceKind, Rotation};

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum Event {
    PieceSpawned {
        kind: PieceKind,
        row: i32,
        col: i32,
    },
    PieceMoved {
        row: i32,
        col: i32,
    },
    PieceRotated {
        accepted: bool,
        rotation: Rotation,
    },
    PieceLocked {
        kind: PieceKind,
        cells: [(i32, i32); 4],
    },
    LinesCleared {
        rows: Vec<usize>,
        count: usize,
        is_tetris: bool,
    },
    ScoreChanged {
        score: u64,
        level: u32,
        combo: u32,
    },
    HoldUsed {
        kind: PieceKind,
    },
    StateChanged {
        mode: Mode,
    },
    GameOver {
        stats: FinalStats,
    },
}

/// Summary handed to the score store when a game ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalStats {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub elapsed_ms: u64,
    pub pieces: u32,
    /// Locked pieces per kind, in `PieceKind::ALL` order
    pub piece_counts: [u32; 7],
}

impl FinalStats {
    pub fn count(&self, kind: PieceKind) -> u32 {
        self.piece_counts[kind.index()]
    }
}

/// Events produced since the last drain, at most one per kind.
///
/// A second event of a kind replaces the first and moves to the back, so
/// order is by latest occurrence and the payload is the latest.
#[derive(Debug, Default)]
pub struct EventFeed {
    events: Vec<Event>,
}

impl EventFeed {
    pub fn push(&mut self, event: Event) {
        let kind: Discriminant<Event> = discriminant(&event);
        match self.events.iter().position(|e| discriminant(e) == kind) {
            Some(slot) => {
                self.events.remove(slot);
                self.events.push(event);
            }
            None => self.events.push(event),
        }
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
