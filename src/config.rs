//! Tunables the core reads; nothing here touches the filesystem

use std::time::Duration;

/// Lock delay settings
pub const LOCK_DELAY: Duration = Duration::from_millis(500);
pub const MAX_LOCK_RESETS: u32 = 15;
/// Gravity multiplier while soft drop is held
pub const SOFT_DROP_FACTOR: u32 = 20;

/// Fixed simulation step (60 Hz)
pub const TICK_RATE: u64 = 60;
pub const TICK: Duration = Duration::from_micros(1_000_000 / TICK_RATE);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Grounded time before a piece locks
    pub lock_delay: Duration,
    /// Lock-timer restarts allowed per piece (refilled on reaching a new lowest row)
    pub max_lock_resets: u32,
    pub soft_drop_factor: u32,
    /// Fixed seed for reproducible bags; `None` draws from OS randomness
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lock_delay: LOCK_DELAY,
            max_lock_resets: MAX_LOCK_RESETS,
            soft_drop_factor: SOFT_DROP_FACTOR,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_lock_delay(mut self, lock_delay: Duration) -> Self {
        self.lock_delay = lock_delay;
        self
    }

    /// Gravity interval with soft drop applied
    pub fn soft_drop_interval(&self, interval: Duration) -> Duration {
        (interval / self.soft_drop_factor.max(1)).max(Duration::from_millis(1))
    }
}
