//! One-shot queue shuffle
//!
//! Shuffling reorders the queue once. Nothing remembers that it happened:
//! a second call permutes whatever order the queue has at that moment.

use cadence_core::Track;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Random permutation of `tracks` (Fisher-Yates)
///
/// Queues of length 0 or 1 come back unchanged.
pub fn shuffled(tracks: &[Track]) -> Vec<Track> {
    let mut rng = thread_rng();
    shuffled_with(tracks, &mut rng)
}

/// Random permutation of `tracks` driven by the given generator
pub fn shuffled_with<R: Rng + ?Sized>(tracks: &[Track], rng: &mut R) -> Vec<Track> {
    let mut out = tracks.to_vec();
    if out.len() > 1 {
        out.shuffle(rng);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn create_test_tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track::new(format!("u:{}", i), format!("Track {}", i), "Test Artist"))
            .collect()
    }

    #[test]
    fn shuffle_preserves_all_tracks() {
        let tracks = create_test_tracks(10);

        let result = shuffled(&tracks);

        let urls: HashSet<&str> = result.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(result.len(), 10);
        assert_eq!(urls.len(), 10);
        assert!(tracks.iter().all(|t| urls.contains(t.url.as_str())));
    }

    #[test]
    fn random_shuffle_changes_order() {
        let tracks = create_test_tracks(8);
        let mut rng = StdRng::seed_from_u64(7);

        let changed = (0..5).any(|_| shuffled_with(&tracks, &mut rng) != tracks);
        assert!(changed);
    }

    #[test]
    fn same_seed_same_order() {
        let tracks = create_test_tracks(6);
        let a = shuffled_with(&tracks, &mut StdRng::seed_from_u64(42));
        let b = shuffled_with(&tracks, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_and_single_are_unchanged() {
        assert!(shuffled(&[]).is_empty());

        let single = create_test_tracks(1);
        assert_eq!(shuffled(&single), single);
    }
}
