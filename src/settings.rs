//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetrs-engine/settings.toml (or platform equivalent).
//! This sits outside the core: the game never reads or writes it, the binary
//! turns it into a [`GameConfig`] and feeds [`FinalStats`] back into it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GameConfig, LOCK_DELAY, MAX_LOCK_RESETS, SOFT_DROP_FACTOR};
use crate::error::{Error, Result};
use crate::event::FinalStats;

/// Entries kept in the high score table
pub const MAX_HIGH_SCORES: usize = 10;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gameplay settings
    pub gameplay: GameplaySettings,
    /// High scores
    pub high_scores: HighScores,
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Lock delay in milliseconds
    pub lock_delay_ms: u64,
    pub max_lock_resets: u32,
    pub soft_drop_factor: u32,
    /// Fixed bag seed, for practising a known sequence
    pub seed: Option<u64>,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            lock_delay_ms: u64::try_from(LOCK_DELAY.as_millis()).unwrap_or(u64::MAX),
            max_lock_resets: MAX_LOCK_RESETS,
            soft_drop_factor: SOFT_DROP_FACTOR,
            seed: None,
        }
    }
}

impl GameplaySettings {
    pub fn to_config(&self) -> GameConfig {
        GameConfig {
            lock_delay: Duration::from_millis(self.lock_delay_ms),
            max_lock_resets: self.max_lock_resets,
            soft_drop_factor: self.soft_drop_factor,
            seed: self.seed,
        }
    }
}

/// Top scores, best first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub time_ms: u64,
    /// Seconds since the Unix epoch
    pub recorded_at: u64,
}

impl HighScores {
    /// Record a finished game; returns its 0-based rank if it made the table
    pub fn insert(&mut self, stats: &FinalStats) -> Option<usize> {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let entry = ScoreEntry {
            score: stats.score,
            lines: stats.lines,
            level: stats.level,
            time_ms: stats.elapsed_ms,
            recorded_at,
        };

        // Ties go below existing entries
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Get the best score
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-engine").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the config dir, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                debug!("using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save settings to the config dir
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().ok_or(Error::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create directory if needed
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
