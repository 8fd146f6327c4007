//! Per-game state: board, active piece, hold, preview, score and timers
//!
//! Everything here is reset by building a fresh `GameState`. The mode machine
//! in [`crate::game`] decides when these operations may run.

use std::time::Duration;

use crate::bag::{Bag, PreviewQueue};
use crate::board::Board;
use crate::config::GameConfig;
use crate::event::{Event, EventFeed, FinalStats};
use crate::piece::Piece;
use crate::score::Score;
use crate::tetromino::{PieceKind, RotationDirection};

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    /// Current falling piece (None once the stack tops out)
    current: Option<Piece>,
    /// Held piece (can swap once per piece)
    hold: Option<PieceKind>,
    /// Whether hold has been used this piece
    hold_used: bool,
    bag: Bag,
    preview: PreviewQueue,
    score: Score,
    /// Soft drop is a held condition, sampled every tick
    soft_drop: bool,
    /// Time accumulated toward the next gravity step
    gravity_timer: Duration,
    /// Time spent grounded (Some while the piece rests on something)
    lock_timer: Option<Duration>,
    /// Number of lock resets used
    lock_resets: u32,
    /// Lowest row reached (for lock reset tracking)
    lowest_row: i32,
    /// Set when a spawn collided
    topped_out: bool,
    config: GameConfig,
}

impl GameState {
    /// Start a game: empty board, full preview, first piece spawned
    pub fn new(mut bag: Bag, config: GameConfig, events: &mut EventFeed) -> Self {
        let preview = PreviewQueue::new(&mut bag);
        let mut state = Self {
            board: Board::new(),
            current: None,
            hold: None,
            hold_used: false,
            bag,
            preview,
            score: Score::new(),
            soft_drop: false,
            gravity_timer: Duration::ZERO,
            lock_timer: None,
            lock_resets: 0,
            lowest_row: i32::MIN,
            topped_out: false,
            config,
        };
        state.push_score(events);
        state.spawn_next(events);
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    /// Where the current piece would land if dropped straight down
    pub fn ghost(&self) -> Option<Piece> {
        self.current
            .map(|piece| piece.placed(piece.rotation, self.board.ghost_position(&piece)))
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used && self.current.is_some()
    }

    pub fn preview(&self) -> &PreviewQueue {
        &self.preview
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    pub fn is_topped_out(&self) -> bool {
        self.topped_out
    }

    pub fn final_stats(&self) -> FinalStats {
        FinalStats {
            score: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
            elapsed_ms: u64::try_from(self.score.elapsed.as_millis()).unwrap_or(u64::MAX),
            pieces: self.score.pieces(),
            piece_counts: self.score.piece_counts,
        }
    }

    /// Shift one column; returns false if blocked
    pub fn shift(&mut self, d_col: i32, events: &mut EventFeed) -> bool {
        let Some(piece) = self.current else {
            return false;
        };
        let Some(moved) = self.board.try_translate(&piece, 0, d_col) else {
            return false;
        };
        self.current = Some(moved);
        self.try_reset_lock();
        events.push(Event::PieceMoved {
            row: moved.row,
            col: moved.col,
        });
        true
    }

    /// Try to rotate using SRS wall kicks; a rejected rotation changes nothing
    pub fn rotate(&mut self, direction: RotationDirection, events: &mut EventFeed) -> bool {
        let Some(piece) = self.current else {
            return false;
        };
        let rotated = self.board.try_rotate(&piece, direction);
        if let Some(rotated) = rotated {
            self.current = Some(rotated);
            self.try_reset_lock();
        }
        events.push(Event::PieceRotated {
            accepted: rotated.is_some(),
            rotation: rotated.unwrap_or(piece).rotation,
        });
        rotated.is_some()
    }

    pub fn set_soft_drop(&mut self, held: bool) {
        self.soft_drop = held;
    }

    /// Drop to the ghost position and lock immediately
    pub fn hard_drop(&mut self, events: &mut EventFeed) {
        let Some(piece) = self.current else {
            return;
        };
        let anchor = self.board.ghost_position(&piece);
        let distance = anchor.0 - piece.row;
        self.current = Some(piece.placed(piece.rotation, anchor));
        self.score.add_hard_drop(distance.unsigned_abs());
        if distance > 0 {
            events.push(Event::PieceMoved {
                row: anchor.0,
                col: anchor.1,
            });
        }
        self.lock(events);
    }

    /// Swap the current piece into hold, once per piece
    pub fn hold(&mut self, events: &mut EventFeed) -> bool {
        if self.hold_used {
            return false;
        }
        let Some(current) = self.current.take() else {
            return false;
        };

        let next = match self.hold.replace(current.kind) {
            Some(held) => held,
            None => self.preview.pop(&mut self.bag),
        };
        self.hold_used = true;
        events.push(Event::HoldUsed { kind: current.kind });
        self.spawn(next, events);
        true
    }

    /// Advance gravity and lock delay by one tick of `dt`
    pub fn advance(&mut self, dt: Duration, events: &mut EventFeed) {
        self.score.elapsed += dt;

        let Some(mut piece) = self.current else {
            return;
        };

        if self.board.try_translate(&piece, 1, 0).is_none() {
            self.gravity_timer = Duration::ZERO;
            let grounded_for = self.lock_timer.map_or(Duration::ZERO, |t| t + dt);
            if grounded_for >= self.config.lock_delay {
                self.lock(events);
            } else {
                self.lock_timer = Some(grounded_for);
            }
            return;
        }

        // Not on ground, apply gravity
        self.lock_timer = None;
        let interval = if self.soft_drop {
            self.config.soft_drop_interval(self.score.drop_interval())
        } else {
            self.score.drop_interval()
        };
        // Time banked at a slower rate counts for at most one step at this one
        self.gravity_timer = self.gravity_timer.min(interval) + dt;

        let mut fallen = 0;
        while self.gravity_timer >= interval {
            self.gravity_timer -= interval;
            match self.board.try_translate(&piece, 1, 0) {
                Some(lower) => {
                    piece = lower;
                    fallen += 1;
                }
                None => {
                    self.gravity_timer = Duration::ZERO;
                    break;
                }
            }
        }

        if fallen > 0 {
            self.current = Some(piece);
            events.push(Event::PieceMoved {
                row: piece.row,
                col: piece.col,
            });
            if self.soft_drop {
                self.score.add_soft_drop(fallen);
                self.push_score(events);
            }
        }
    }

    /// Lock the current piece, clear rows, score, and spawn the next one
    fn lock(&mut self, events: &mut EventFeed) {
        let Some(piece) = self.current.take() else {
            return;
        };

        let cells = piece.cells();
        self.board.commit(&cells, piece.kind);
        events.push(Event::PieceLocked {
            kind: piece.kind,
            cells,
        });

        let rows = self.board.clear_full_rows();
        self.score.on_lines_cleared(rows.len());
        self.score.record_piece(piece.kind);
        if !rows.is_empty() {
            events.push(Event::LinesCleared {
                count: rows.len(),
                is_tetris: rows.len() == 4,
                rows,
            });
        }
        self.push_score(events);

        self.hold_used = false;
        self.spawn_next(events);
    }

    fn spawn_next(&mut self, events: &mut EventFeed) {
        let kind = self.preview.pop(&mut self.bag);
        self.spawn(kind, events);
    }

    /// Place a fresh piece at its spawn anchor; a collision tops the game out
    fn spawn(&mut self, kind: PieceKind, events: &mut EventFeed) {
        let piece = Piece::new(kind);
        self.reset_piece_timers();

        if !self.board.is_valid(&piece.cells()) {
            self.topped_out = true;
            self.current = None;
            return;
        }

        self.current = Some(piece);
        events.push(Event::PieceSpawned {
            kind,
            row: piece.row,
            col: piece.col,
        });
    }

    /// Restart the lock timer after a successful move, within the reset budget
    fn try_reset_lock(&mut self) {
        let Some(piece) = &self.current else {
            return;
        };
        if piece.row > self.lowest_row {
            self.lowest_row = piece.row;
            self.lock_resets = 0;
        }
        if self.lock_timer.is_some() && self.lock_resets < self.config.max_lock_resets {
            self.lock_timer = Some(Duration::ZERO);
            self.lock_resets += 1;
        }
    }

    fn reset_piece_timers(&mut self) {
        self.gravity_timer = Duration::ZERO;
        self.lock_timer = None;
        self.lock_resets = 0;
        self.lowest_row = i32::MIN;
    }

    fn push_score(&self, events: &mut EventFeed) {
        events.push(Event::ScoreChanged {
            score: self.score.points,
            level: self.score.level,
            combo: self.score.combo(),
        });
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn score_mut(&mut self) -> &mut Score {
        &mut self.score
    }
}
