//! Audio engine seam
//!
//! Cadence never decodes or outputs audio itself. An `AudioEngine` owns the
//! real queue, the active index, the repeat mode and the output volume; the
//! playback controller issues commands against it and reads state back.

use crate::error::EngineResult;
use crate::types::{PlaybackState, Progress, RepeatMode, Track};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Capability set of an external audio engine
///
/// Every call is an asynchronous completion. Implementations are shared
/// behind `&self` and must provide their own interior synchronization.
/// Callers issue commands strictly in sequence; the trait makes no promise
/// about interleaving two command sequences.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    // ========================================================================
    // Setup
    // ========================================================================

    /// Apply engine options (cache size, exposed media capabilities)
    async fn configure(&self, options: &EngineOptions) -> EngineResult<()>;

    // ========================================================================
    // Queue
    // ========================================================================

    /// Drop the whole queue and the active position
    async fn reset_queue(&self) -> EngineResult<()>;

    /// Append tracks to the end of the queue, in order
    async fn add_tracks(&self, tracks: &[Track]) -> EngineResult<()>;

    /// Full queue in play order
    async fn queue(&self) -> EngineResult<Vec<Track>>;

    /// Index of the active track, `None` when the queue is empty
    async fn active_index(&self) -> EngineResult<Option<usize>>;

    /// Active track, `None` when the queue is empty
    async fn active_track(&self) -> EngineResult<Option<Track>>;

    // ========================================================================
    // Transport
    // ========================================================================

    async fn play(&self) -> EngineResult<()>;

    async fn pause(&self) -> EngineResult<()>;

    async fn stop(&self) -> EngineResult<()>;

    /// Move to the next track. Boundary behaviour is engine-defined.
    async fn skip_next(&self) -> EngineResult<()>;

    /// Move to the previous track. Boundary behaviour is engine-defined.
    async fn skip_previous(&self) -> EngineResult<()>;

    /// Seek within the active track
    async fn seek(&self, position: Duration) -> EngineResult<()>;

    async fn playback_state(&self) -> EngineResult<PlaybackState>;

    async fn progress(&self) -> EngineResult<Progress>;

    // ========================================================================
    // Volume and repeat
    // ========================================================================

    /// Set output volume in `0.0..=1.0`
    async fn set_volume(&self, volume: f32) -> EngineResult<()>;

    async fn volume(&self) -> EngineResult<f32>;

    async fn set_repeat_mode(&self, mode: RepeatMode) -> EngineResult<()>;

    async fn repeat_mode(&self) -> EngineResult<RepeatMode>;
}

/// Names every call on `AudioEngine`
///
/// Used for error context and for recording command order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCommand {
    Configure,
    ResetQueue,
    AddTracks,
    Queue,
    ActiveIndex,
    ActiveTrack,
    Play,
    Pause,
    Stop,
    SkipNext,
    SkipPrevious,
    Seek,
    PlaybackState,
    Progress,
    SetVolume,
    Volume,
    SetRepeatMode,
    RepeatMode,
}

impl EngineCommand {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::ResetQueue => "reset_queue",
            Self::AddTracks => "add_tracks",
            Self::Queue => "queue",
            Self::ActiveIndex => "active_index",
            Self::ActiveTrack => "active_track",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::SkipNext => "skip_next",
            Self::SkipPrevious => "skip_previous",
            Self::Seek => "seek",
            Self::PlaybackState => "playback_state",
            Self::Progress => "progress",
            Self::SetVolume => "set_volume",
            Self::Volume => "volume",
            Self::SetRepeatMode => "set_repeat_mode",
            Self::RepeatMode => "repeat_mode",
        }
    }

    /// Whether the call changes engine state
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Queue
                | Self::ActiveIndex
                | Self::ActiveTrack
                | Self::PlaybackState
                | Self::Progress
                | Self::Volume
                | Self::RepeatMode
        )
    }
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media capability exposed to the OS (notification, lock screen, headset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Play,
    Pause,
    Stop,
    SkipToNext,
    SkipToPrevious,
    SeekTo,
}

/// Options handed to the engine during setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Maximum media cache size in kilobytes (default: 10240)
    #[serde(default = "default_max_cache_size_kb")]
    pub max_cache_size_kb: u64,

    /// Capabilities shown in the expanded notification
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,

    /// Capabilities shown in the compact notification
    #[serde(default = "default_compact_capabilities")]
    pub compact_capabilities: Vec<Capability>,
}

fn default_max_cache_size_kb() -> u64 {
    1024 * 10
}

fn default_capabilities() -> Vec<Capability> {
    vec![
        Capability::Play,
        Capability::Pause,
        Capability::SkipToNext,
        Capability::SkipToPrevious,
        Capability::Stop,
    ]
}

fn default_compact_capabilities() -> Vec<Capability> {
    vec![Capability::Play, Capability::Pause]
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_cache_size_kb: default_max_cache_size_kb(),
            capabilities: default_capabilities(),
            compact_capabilities: default_compact_capabilities(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = EngineOptions::default();
        assert_eq!(options.max_cache_size_kb, 10240);
        assert_eq!(options.capabilities.len(), 5);
        assert_eq!(
            options.compact_capabilities,
            vec![Capability::Play, Capability::Pause]
        );
    }

    #[test]
    fn options_fill_missing_fields() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"max_cache_size_kb": 512}"#).unwrap();
        assert_eq!(options.max_cache_size_kb, 512);
        assert_eq!(options.capabilities, default_capabilities());
    }

    #[test]
    fn queries_are_not_mutations() {
        assert!(EngineCommand::ResetQueue.is_mutation());
        assert!(EngineCommand::SetRepeatMode.is_mutation());
        assert!(!EngineCommand::Queue.is_mutation());
        assert!(!EngineCommand::RepeatMode.is_mutation());
        assert_eq!(EngineCommand::AddTracks.to_string(), "add_tracks");
    }
}
