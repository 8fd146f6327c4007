//! Top-level game modes and the legal transitions between them

use serde::Serialize;

/// Where the machine is in the menu → play → game-over cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Mode {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Inputs that move the machine between modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    PauseToggle,
    TopOut,
    Restart,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Menu => "Menu",
            Mode::Playing => "Playing",
            Mode::Paused => "Paused",
            Mode::GameOver => "Game Over",
        }
    }

    /// Target mode for a trigger, or None when the trigger does not apply here
    pub fn on(self, trigger: Trigger) -> Option<Mode> {
        match (self, trigger) {
            (Mode::Menu, Trigger::Start) => Some(Mode::Playing),
            (Mode::Playing, Trigger::PauseToggle) => Some(Mode::Paused),
            (Mode::Paused, Trigger::PauseToggle) => Some(Mode::Playing),
            (Mode::Playing, Trigger::TopOut) => Some(Mode::GameOver),
            (Mode::GameOver, Trigger::Restart) => Some(Mode::Playing),
            _ => None,
        }
    }

    /// Whether piece movement and gravity are live
    pub fn is_live(&self) -> bool {
        matches!(self, Mode::Playing)
    }
}
