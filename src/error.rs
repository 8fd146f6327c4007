//! Error type for the settings and score-store surface.
//!
//! Gameplay itself never fails: illegal moves are no-ops and a blocked spawn
//! is a mode change.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    /// The platform has no config directory for this user
    NoConfigDir,
    Io(io::Error),
    /// Settings file exists but is not valid TOML for [`crate::settings::Settings`]
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoConfigDir => write!(f, "could not determine config directory"),
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Error::Serialize(e) => write!(f, "failed to serialize settings: {e}"),
            Error::Json(e) => write!(f, "failed to encode event: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NoConfigDir => None,
            Error::Io(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Serialize(e) => Some(e),
            Error::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Parse(e)
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialize(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
