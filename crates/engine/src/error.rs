use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands, backends and configuration.
#[derive(Debug)]
pub enum EngineError {
    TrackIndexOutOfRange {
        index: usize,
        len: usize,
    },
    InvalidTrack {
        track_id: i64,
        reason: String,
    },
    Api(track_api::TrackApiError),
    Host {
        context: &'static str,
        message: String,
    },
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigFormat {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl EngineError {
    /// Returns `true` when the failure happened before any server response.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Api(err) => err.is_transport(),
            Self::Host { .. } => true,
            _ => false,
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrackIndexOutOfRange { index, len } => {
                write!(f, "track index {index} is out of range for {len} tracks")
            }
            Self::InvalidTrack { track_id, reason } => {
                write!(f, "invalid track {track_id}: {reason}")
            }
            Self::Api(err) => write!(f, "{err}"),
            Self::Host { context, message } => write!(f, "{context}: {message}"),
            Self::ConfigIo { path, source } => {
                write!(f, "config file {} is unreadable ({source})", path.display())
            }
            Self::ConfigFormat { path, source } => {
                write!(f, "config file {} is invalid ({source})", path.display())
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigFormat { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<track_api::TrackApiError> for EngineError {
    fn from(value: track_api::TrackApiError) -> Self {
        Self::Api(value)
    }
}
