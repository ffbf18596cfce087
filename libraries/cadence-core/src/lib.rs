//! Cadence Core
//!
//! Platform-agnostic types and the audio engine seam for Cadence.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Listing`, `Catalog`, `RepeatMode`, `Progress`
//! - **Engine Trait**: `AudioEngine`, the capability set an external playback
//!   library must offer (queue, transport, volume, repeat, status queries)
//! - **Error Handling**: `EngineError` and the `EngineResult` alias
//!
//! No audio is decoded here. Whatever actually plays sound lives behind
//! `AudioEngine` and is injected by the caller.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Listing, RepeatMode, Track};
//!
//! let listing = Listing::new(
//!     "Recommended for you",
//!     vec![
//!         Track::new("https://cdn.example/royalty.mp3", "Royalty", "Egzod"),
//!         Track::new("https://cdn.example/worship.mp3", "Worship", "Diamond Eyes"),
//!     ],
//! );
//!
//! assert_eq!(listing.position_of("https://cdn.example/worship.mp3"), Some(1));
//! assert_eq!(RepeatMode::Off.cycle(), RepeatMode::Track);
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{AudioEngine, Capability, EngineCommand, EngineOptions};
pub use error::{EngineError, EngineResult};
pub use types::{Catalog, Listing, PlaybackState, Progress, RepeatMode, Track};
