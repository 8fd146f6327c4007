//! TETRS engine - a Rusty falling-block simulation core
//!
//! Rules, timing and events for a 10x20 seven-piece puzzle, with no
//! rendering, audio or networking. Drive a [`Game`] with [`Action`]s and
//! fixed ticks, read the query surface or take a [`Snapshot`], and consume
//! the [`Event`]s each tick returns.

pub mod autoplay;
pub mod bag;
pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod mode;
pub mod piece;
pub mod score;
pub mod settings;
pub mod snapshot;
pub mod srs;
pub mod state;
pub mod tetromino;

pub use board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell};
pub use config::{GameConfig, TICK};
pub use error::Error;
pub use event::{Event, FinalStats};
pub use game::{Action, Game};
pub use mode::Mode;
pub use piece::Piece;
pub use snapshot::Snapshot;
pub use tetromino::{PieceKind, Rotation, RotationDirection};
