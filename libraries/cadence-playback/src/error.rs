//! Error types for the playback controller

use cadence_core::{EngineCommand, EngineError};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Selected track is not part of the listing it was picked from
    #[error("Track not found in listing: {url}")]
    TrackNotFoundInListing { url: String },

    /// No listing with this name in the catalog
    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    /// An engine call failed; the rest of the command sequence was skipped
    #[error("Engine command {command} failed: {source}")]
    EngineCommandFailed {
        command: EngineCommand,
        #[source]
        source: EngineError,
    },

    /// Another queue change is still being applied to the engine
    #[error("Another queue change is still in progress")]
    CommandInFlight,

    /// Volume is not a number
    #[error("Invalid volume: {0}")]
    InvalidVolume(f32),

    /// Seek fraction outside 0.0..=1.0
    #[error("Invalid seek fraction: {0}")]
    InvalidSeekFraction(f32),
}

impl PlaybackError {
    pub(crate) fn engine(command: EngineCommand, source: EngineError) -> Self {
        Self::EngineCommandFailed { command, source }
    }

    /// Whether this error came from the engine rather than from the request
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::EngineCommandFailed { .. })
    }

    /// Short message suitable for a transient on-screen notice
    pub fn notice(&self) -> String {
        match self {
            Self::TrackNotFoundInListing { .. } => "That track is no longer available".to_string(),
            Self::ListingNotFound(name) => format!("Couldn't find \"{name}\""),
            Self::EngineCommandFailed { command, .. } => match command {
                EngineCommand::ResetQueue | EngineCommand::AddTracks => {
                    "Couldn't update the play queue".to_string()
                }
                EngineCommand::SkipNext | EngineCommand::SkipPrevious => {
                    "Couldn't change track".to_string()
                }
                EngineCommand::SetVolume => "Couldn't change the volume".to_string(),
                EngineCommand::SetRepeatMode => "Couldn't change repeat mode".to_string(),
                _ => "Playback is not responding".to_string(),
            },
            Self::CommandInFlight => "Still working on the last change".to_string(),
            Self::InvalidVolume(_) | Self::InvalidSeekFraction(_) => {
                "That value is out of range".to_string()
            }
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_failure_keeps_source() {
        let err = PlaybackError::engine(EngineCommand::AddTracks, EngineError::NoTrack);
        assert!(err.is_engine_failure());
        assert_eq!(
            err.to_string(),
            "Engine command add_tracks failed: No track available"
        );
        assert_eq!(err.notice(), "Couldn't update the play queue");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn request_errors_are_not_engine_failures() {
        let err = PlaybackError::TrackNotFoundInListing {
            url: "u:z".to_string(),
        };
        assert!(!err.is_engine_failure());
        assert!(err.to_string().contains("u:z"));
    }
}
