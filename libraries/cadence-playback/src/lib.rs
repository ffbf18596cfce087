//! Cadence - Playback Queue Controller
//!
//! Turns user gestures into ordered command sequences for an audio engine.
//!
//! This crate provides:
//! - Track selection from a listing (rotated queue: selected, after, before)
//! - Repeat mode cycling (Off -> Track -> Queue -> Off)
//! - One-shot queue shuffle
//! - Skip next/previous, play/pause, seek
//! - Mute toggle and volume
//! - Event notifications for UI layers
//!
//! # Architecture
//!
//! The controller holds no mirror of playback state. The engine is injected
//! through the [`AudioEngine`](cadence_core::AudioEngine) trait and every
//! query goes back to it, so the engine stays the single source of truth.
//! [`MemoryEngine`] is an in-process engine for tests and the CLI.
//!
//! # Example: Select a track
//!
//! ```rust
//! use cadence_core::{Listing, RepeatMode, Track};
//! use cadence_playback::{MemoryEngine, PlaybackController};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let listing = Listing::new(
//!     "Favorites",
//!     ["a", "b", "c", "d"]
//!         .iter()
//!         .map(|id| Track::new(*id, id.to_uppercase(), "Artist"))
//!         .collect(),
//! );
//!
//! let controller = PlaybackController::new(MemoryEngine::new());
//!
//! // Picking C queues C, D, A, B and starts playing C
//! let queue = controller.select_track(&listing, &listing.tracks[2]).await.unwrap();
//! let urls: Vec<_> = queue.iter().map(|t| t.url.as_str()).collect();
//! assert_eq!(urls, ["c", "d", "a", "b"]);
//!
//! // Repeat cycles from whatever the engine reports
//! assert_eq!(controller.cycle_repeat_mode().await.unwrap(), RepeatMode::Track);
//! # });
//! ```

mod controller;
mod error;
mod events;
mod memory;
mod queue;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::{PlayerEvent, EVENT_CHANNEL_CAPACITY};
pub use memory::MemoryEngine;
pub use queue::{rotate_to_front, unique_by_url, RotatedQueue};
pub use shuffle::{shuffled, shuffled_with};
pub use types::{Direction, PlayerSetup, PlayerStatus};
pub use volume::Volume;
