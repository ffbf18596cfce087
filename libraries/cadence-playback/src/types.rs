//! Controller-facing types

use cadence_core::{EngineOptions, PlaybackState, Progress, RepeatMode, Track};
use serde::{Deserialize, Serialize};

use crate::volume::Volume;

/// Direction for `PlaybackController::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Previous,
}

/// One-time player setup applied at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Options forwarded to the engine
    #[serde(default)]
    pub engine: EngineOptions,

    /// Initial output volume (0.0-1.0, default: 0.5)
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Initial repeat mode (default: Queue)
    #[serde(default = "default_initial_repeat_mode")]
    pub initial_repeat_mode: RepeatMode,
}

fn default_initial_volume() -> f32 {
    0.5
}

fn default_initial_repeat_mode() -> RepeatMode {
    RepeatMode::Queue
}

impl Default for PlayerSetup {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            initial_volume: default_initial_volume(),
            initial_repeat_mode: default_initial_repeat_mode(),
        }
    }
}

/// Snapshot of engine state, read fresh on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub active_track: Option<Track>,
    pub active_index: Option<usize>,
    pub queue_length: usize,
    pub progress: Progress,
    pub repeat_mode: RepeatMode,
    pub state: PlaybackState,
    pub volume: f32,
}

impl PlayerStatus {
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn is_muted(&self) -> bool {
        Volume::new(self.volume).is_muted()
    }
}
