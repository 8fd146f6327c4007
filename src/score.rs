//! Scoring, level progression and play metrics

use std::time::Duration;

use serde::Serialize;

use crate::tetromino::PieceKind;

/// Points per cleared-line count, before the level multiplier
const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];
const COMBO_BONUS: u64 = 50;
const HARD_DROP_POINTS_PER_ROW: u64 = 2;
const SOFT_DROP_POINTS_PER_ROW: u64 = 1;
const LINES_PER_LEVEL: u32 = 10;

/// Score tracking
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Current combo count (-1 = no clear on the previous lock)
    combo: i32,
    /// Time spent playing (pauses excluded)
    pub elapsed: Duration,
    /// Locked pieces per kind, indexed by `PieceKind::index`
    pub piece_counts: [u32; 7],
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            combo: -1,
            elapsed: Duration::ZERO,
            piece_counts: [0; 7],
        }
    }

    /// Score one lock that cleared `cleared` rows and return the points awarded.
    ///
    /// Points use the level in force before this clear; the level is then
    /// recomputed from the new line total.
    pub fn on_lines_cleared(&mut self, cleared: usize) -> u64 {
        if cleared == 0 {
            self.reset_combo();
            return 0;
        }

        let level = u64::from(self.level);
        let base = LINE_SCORES[cleared.min(LINE_SCORES.len() - 1)];
        let mut score = base * level;

        self.combo += 1;
        if self.combo > 0 {
            score += COMBO_BONUS * self.combo.unsigned_abs() as u64 * level;
        }

        self.points += score;
        self.lines += cleared as u32;
        self.level = 1 + self.lines / LINES_PER_LEVEL;
        score
    }

    /// Reset combo (called when piece locks without clearing lines)
    pub fn reset_combo(&mut self) {
        self.combo = -1;
    }

    /// Combo as reported to consumers: 0 until a second consecutive clear
    pub fn combo(&self) -> u32 {
        self.combo.max(0).unsigned_abs()
    }

    /// Add score for soft drop (1 point per row)
    pub fn add_soft_drop(&mut self, rows: u32) {
        self.points += u64::from(rows) * SOFT_DROP_POINTS_PER_ROW;
    }

    /// Add score for hard drop (2 points per row)
    pub fn add_hard_drop(&mut self, rows: u32) {
        self.points += u64::from(rows) * HARD_DROP_POINTS_PER_ROW;
    }

    pub fn record_piece(&mut self, kind: PieceKind) {
        self.piece_counts[kind.index()] += 1;
    }

    pub fn pieces(&self) -> u32 {
        self.piece_counts.iter().sum()
    }

    /// Gravity interval for the current level
    pub fn drop_interval(&self) -> Duration {
        let steps = u64::from(self.level.saturating_sub(1));
        Duration::from_millis(500u64.saturating_sub(steps * 50).max(50))
    }

    /// Locked pieces per second of play
    pub fn pieces_per_second(&self) -> f64 {
        self.rate(self.pieces())
    }

    /// Cleared lines per second of play
    pub fn lines_per_second(&self) -> f64 {
        self.rate(self.lines)
    }

    fn rate(&self, count: u32) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { f64::from(count) / secs } else { 0.0 }
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            score: self.points,
            level: self.level,
            lines: self.lines,
            combo: self.combo(),
            pieces_per_second: self.pieces_per_second(),
            lines_per_second: self.lines_per_second(),
            elapsed: self.elapsed,
        }
    }
}

/// Read-only copy of the tracker for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub pieces_per_second: f64,
    pub lines_per_second: f64,
    pub elapsed: Duration,
}
