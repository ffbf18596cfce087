//! Queue construction from a listing
//!
//! Selecting a track rotates the listing so the selection plays first and
//! every other track stays reachable through "next":
//!
//! ```text
//! Listing:   A  B  [C]  D
//! Queue:    [C]  D   A  B
//!            │   └ after  └ before
//!            └ selected
//! ```

use cadence_core::Track;
use std::collections::HashSet;

/// A listing rotated to start at the selected track
///
/// Kept in three parts because the engine is fed in that order: the
/// selected track first, then the tracks after it, then the ones before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedQueue {
    pub selected: Track,
    pub after: Vec<Track>,
    pub before: Vec<Track>,
}

impl RotatedQueue {
    /// Total number of tracks in the queue
    pub fn len(&self) -> usize {
        1 + self.after.len() + self.before.len()
    }

    /// Never empty: the selected track is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tracks in play order
    pub fn to_tracks(&self) -> Vec<Track> {
        let mut tracks = Vec::with_capacity(self.len());
        tracks.push(self.selected.clone());
        tracks.extend(self.after.iter().cloned());
        tracks.extend(self.before.iter().cloned());
        tracks
    }

    /// Consume into tracks in play order
    pub fn into_tracks(self) -> Vec<Track> {
        let mut tracks = Vec::with_capacity(self.len());
        tracks.push(self.selected);
        tracks.extend(self.after);
        tracks.extend(self.before);
        tracks
    }
}

/// Drop repeated urls, keeping the first occurrence of each
pub fn unique_by_url(tracks: &[Track]) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(tracks.len());
    tracks
        .iter()
        .filter(|t| seen.insert(t.url.as_str()))
        .cloned()
        .collect()
}

/// Rotate `tracks` so the track with `url` comes first
///
/// Returns `None` when no track in `tracks` has that url. Repeated urls in
/// the listing collapse to their first occurrence so the queue never holds
/// the same track twice.
pub fn rotate_to_front(tracks: &[Track], url: &str) -> Option<RotatedQueue> {
    let mut unique = unique_by_url(tracks);
    let index = unique.iter().position(|t| t.url == url)?;

    let after = unique.split_off(index + 1);
    let selected = unique.pop()?;
    let before = unique;

    Some(RotatedQueue {
        selected,
        after,
        before,
    })
}
