/// Playback state types reported by an audio engine
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Repeat mode for playback
///
/// Decides what the engine does when the active track completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the active track
    Track,

    /// Loop the whole queue
    Queue,
}

impl RepeatMode {
    /// Toggle order: `Off -> Track -> Queue -> Off`
    pub const CYCLE: [RepeatMode; 3] = [RepeatMode::Off, RepeatMode::Track, RepeatMode::Queue];

    /// Successor in the toggle order
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::Track,
            Self::Track => Self::Queue,
            Self::Queue => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Track => "track",
            Self::Queue => "queue",
        }
    }

    /// Human-readable description of the mode
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "repeat disabled",
            Self::Queue => "repeat whole queue",
            Self::Track => "repeat single track",
        }
    }

    /// Icon name for the toggle button
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Off => "repeat-off",
            Self::Queue => "repeat",
            Self::Track => "repeat-once",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "track" => Ok(Self::Track),
            "queue" => Ok(Self::Queue),
            other => Err(format!("unknown repeat mode: {other}")),
        }
    }
}

/// Transport state as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// Nothing loaded
    #[default]
    None,

    /// Track loaded, not started
    Ready,

    Playing,

    Paused,

    Stopped,

    /// Reached the end of the queue
    Ended,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Position within the active track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub position: Duration,

    /// Zero when unknown
    pub duration: Duration,
}

impl Progress {
    pub fn new(position: Duration, duration: Duration) -> Self {
        Self { position, duration }
    }

    /// Position as a fraction of the duration, clamped to `0.0..=1.0`
    ///
    /// Returns 0.0 when the duration is unknown.
    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Time left in the track (never negative)
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.position)
    }

    /// Elapsed time as `MM:SS`
    pub fn elapsed_label(&self) -> String {
        format_clock(self.position)
    }

    /// Remaining time as `-MM:SS`
    pub fn remaining_label(&self) -> String {
        format!("-{}", format_clock(self.remaining()))
    }
}

/// Format whole seconds as `MM:SS`; minutes keep counting past 59
fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
