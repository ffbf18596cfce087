//! Engine command ordering tests
//!
//! Uses a mocked engine with strict call sequences, so any reordering,
//! extra mutation or retry fails the test.

use async_trait::async_trait;
use cadence_core::{
    AudioEngine, EngineError, EngineOptions, EngineResult, Listing, PlaybackState, Progress,
    RepeatMode, Track,
};
use cadence_playback::{PlaybackController, PlaybackError};
use mockall::{mock, Sequence};
use std::time::Duration;

mock! {
    pub Engine {}

    #[async_trait]
    impl AudioEngine for Engine {
        async fn configure(&self, options: &EngineOptions) -> EngineResult<()>;
        async fn reset_queue(&self) -> EngineResult<()>;
        async fn add_tracks(&self, tracks: &[Track]) -> EngineResult<()>;
        async fn queue(&self) -> EngineResult<Vec<Track>>;
        async fn active_index(&self) -> EngineResult<Option<usize>>;
        async fn active_track(&self) -> EngineResult<Option<Track>>;
        async fn play(&self) -> EngineResult<()>;
        async fn pause(&self) -> EngineResult<()>;
        async fn stop(&self) -> EngineResult<()>;
        async fn skip_next(&self) -> EngineResult<()>;
        async fn skip_previous(&self) -> EngineResult<()>;
        async fn seek(&self, position: Duration) -> EngineResult<()>;
        async fn playback_state(&self) -> EngineResult<PlaybackState>;
        async fn progress(&self) -> EngineResult<Progress>;
        async fn set_volume(&self, volume: f32) -> EngineResult<()>;
        async fn volume(&self) -> EngineResult<f32>;
        async fn set_repeat_mode(&self, mode: RepeatMode) -> EngineResult<()>;
        async fn repeat_mode(&self) -> EngineResult<RepeatMode>;
    }
}

fn create_listing() -> Listing {
    Listing::new(
        "Mix",
        ["a", "b", "c", "d"]
            .iter()
            .map(|id| Track::new(*id, id.to_uppercase(), "Test Artist"))
            .collect(),
    )
}

fn urls(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.url.as_str()).collect()
}

#[tokio::test]
async fn test_select_track_command_order() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    engine
        .expect_reset_queue()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["c"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["d"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["a", "b"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_play()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let controller = PlaybackController::new(engine);
    let listing = create_listing();

    let queue = controller
        .select_track(&listing, &listing.tracks[2])
        .await
        .unwrap();

    assert_eq!(urls(&queue), ["c", "d", "a", "b"]);
}

#[tokio::test]
async fn test_select_last_track_skips_empty_batch() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    engine
        .expect_reset_queue()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["d"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["a", "b", "c"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_play()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));

    let controller = PlaybackController::new(engine);
    let listing = create_listing();

    controller
        .select_track(&listing, &listing.tracks[3])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_failed_add_stops_sequence() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    engine
        .expect_reset_queue()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["a"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_add_tracks()
        .withf(|tracks| urls(tracks) == ["b", "c", "d"])
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(EngineError::unavailable("player service died")));
    engine.expect_play().never();

    // State is re-read after the failure
    engine.expect_queue().times(1).returning(|| Ok(Vec::new()));
    engine.expect_active_index().times(1).returning(|| Ok(None));

    let controller = PlaybackController::new(engine);
    let listing = create_listing();

    let err = controller
        .select_track(&listing, &listing.tracks[0])
        .await
        .unwrap_err();

    match err {
        PlaybackError::EngineCommandFailed { source, .. } => {
            assert_eq!(source, EngineError::unavailable("player service died"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_repeat_cycle_reads_then_writes() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    engine
        .expect_repeat_mode()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(RepeatMode::Track));
    engine
        .expect_active_index()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(Some(0)));
    engine
        .expect_set_repeat_mode()
        .withf(|mode| *mode == RepeatMode::Queue)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let controller = PlaybackController::new(engine);

    assert_eq!(controller.cycle_repeat_mode().await.unwrap(), RepeatMode::Queue);
}

#[tokio::test]
async fn test_unmute_writes_full_volume() {
    let mut engine = MockEngine::new();

    engine.expect_volume().times(1).returning(|| Ok(0.0));
    engine
        .expect_set_volume()
        .withf(|volume| *volume == 1.0)
        .times(1)
        .returning(|_| Ok(()));

    let controller = PlaybackController::new(engine);

    assert!(!controller.toggle_mute().await.unwrap());
}
