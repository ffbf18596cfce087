/// Listings and catalogs: the sources a queue is built from
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Named group of tracks as presented to the user
/// ("Recommended for you", "Liked Songs", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Display name, also used for lookup in a catalog
    pub name: String,

    /// Tracks in display order
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Listing {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        Self {
            name: name.into(),
            tracks,
        }
    }

    /// Position of the first track with the given url
    pub fn position_of(&self, url: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.url == url)
    }

    /// Track with the given url
    pub fn find(&self, url: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.url == url)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Ordered set of listings from an external catalog source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub listings: Vec<Listing>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Listing with the given name (case-sensitive)
    pub fn listing(&self, name: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.name == name)
    }
}
