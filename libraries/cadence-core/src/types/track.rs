/// Track domain type
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable track as delivered by a catalog
///
/// Identity for queue operations is the `url`: two records with the same
/// `url` are the same track even if their display metadata differs. Use
/// [`Track::is_same_track`] for that check; `==` and `Hash` compare the full
/// record, metadata included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Playable resource locator
    pub url: String,

    /// Track title
    pub title: String,

    /// Artist credit line
    pub artist: String,

    /// Artwork URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,

    /// Track duration in milliseconds, when the catalog knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Create a track with no artwork and unknown duration
    pub fn new(url: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            artist: artist.into(),
            artwork: None,
            duration_ms: None,
        }
    }

    /// Builder-style artwork setter
    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Builder-style duration setter
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Whether both records point at the same playable resource
    pub fn is_same_track(&self, other: &Track) -> bool {
        self.url == other.url
    }
}
