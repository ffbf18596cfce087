//! Controller Events
//!
//! Event-based notification for UI layers. Events are published after a
//! command sequence has been fully applied to the engine, or when one fails:
//! - Queue replaced (track selected, queue shuffled)
//! - Repeat mode changed
//! - Volume changed (including mute)
//! - Play/pause toggled
//! - Notice (short user-facing message after an engine failure)
//!
//! Events describe what the controller asked for. They are not a cache of
//! engine state; query the controller for that.

use cadence_core::RepeatMode;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default buffer for slow subscribers before they start lagging
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Engine queue was rebuilt
    QueueReplaced {
        /// New queue length
        length: usize,
        /// Index the engine starts from
        active_index: Option<usize>,
    },

    /// Repeat mode changed
    RepeatModeChanged {
        mode: RepeatMode,
    },

    /// Volume changed
    VolumeChanged {
        /// New level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Play/pause toggled
    PlaybackToggled {
        playing: bool,
    },

    /// Transient user-facing notice
    Notice {
        message: String,
    },
}

/// Publishing side of the event channel
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers; having none is fine
    pub(crate) fn publish(&self, event: PlayerEvent) {
        let _ = self.sender.send(event);
    }
}
