//! In-process reference engine
//!
//! `MemoryEngine` keeps a queue, an active index and a transport state in
//! memory and produces no sound. It behaves like a typical mobile playback
//! library at the queue boundaries:
//! - `skip_next` past the last track wraps only under `RepeatMode::Queue`
//! - `skip_previous` before the first track wraps only under `RepeatMode::Queue`
//! - otherwise both fail with `EngineError::NoTrack`
//!
//! Time only moves when `advance_clock` is called, which also applies the
//! repeat mode when a track runs out. Every call is recorded in a command log,
//! and individual commands can be made to fail, for exercising callers.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::{
    AudioEngine, EngineCommand, EngineError, EngineOptions, EngineResult, PlaybackState,
    Progress, RepeatMode, Track,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct EngineState {
    queue: Vec<Track>,
    active: Option<usize>,
    state: PlaybackState,
    position: Duration,
    volume: f32,
    repeat: RepeatMode,
    options: Option<EngineOptions>,
    log: Vec<EngineCommand>,
    failing: HashSet<EngineCommand>,
}

impl EngineState {
    fn active_duration(&self) -> Duration {
        self.active
            .and_then(|i| self.queue.get(i))
            .and_then(Track::duration)
            .unwrap_or_default()
    }

    fn require_active(&self) -> EngineResult<usize> {
        self.active.ok_or(EngineError::NoTrack)
    }

    /// Move to `index` from the start of the track
    fn jump(&mut self, index: usize) {
        self.active = Some(index);
        self.position = Duration::ZERO;
    }

    /// Playback time after which the current position repeats exactly
    ///
    /// `None` when repeat is off or some duration in the cycle is unknown.
    fn repeat_cycle(&self) -> Option<Duration> {
        let cycle = match self.repeat {
            RepeatMode::Off => return None,
            RepeatMode::Track => self.active_duration(),
            RepeatMode::Queue => self
                .queue
                .iter()
                .map(|t| t.duration().filter(|d| !d.is_zero()))
                .try_fold(Duration::ZERO, |total, d| Some(total.saturating_add(d?)))?,
        };
        (!cycle.is_zero()).then_some(cycle)
    }

    /// Apply the repeat mode when the active track has played to the end
    ///
    /// Returns false when playback stopped at the end of the queue.
    fn finish_track(&mut self) -> bool {
        let Some(index) = self.active else {
            return false;
        };
        let len = self.queue.len();

        match self.repeat {
            RepeatMode::Track => self.jump(index),
            RepeatMode::Queue => self.jump((index + 1) % len),
            RepeatMode::Off if index + 1 < len => self.jump(index + 1),
            RepeatMode::Off => {
                self.position = self.active_duration();
                self.state = PlaybackState::Ended;
                debug!("MemoryEngine: reached end of queue");
                return false;
            }
        }
        true
    }
}

/// `elapsed` modulo `cycle`
fn wrap_duration(elapsed: Duration, cycle: Duration) -> Duration {
    let nanos = elapsed.as_nanos() % cycle.as_nanos();
    Duration::new(
        (nanos / 1_000_000_000) as u64,
        (nanos % 1_000_000_000) as u32,
    )
}

/// Reference `AudioEngine` held entirely in memory
#[derive(Debug)]
pub struct MemoryEngine {
    inner: Mutex<EngineState>,
    latency: Duration,
}

impl MemoryEngine {
    /// Create an empty engine at full volume with repeat off
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(EngineState {
                volume: 1.0,
                ..EngineState::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delay every mutating command by `latency` before applying it
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every later call of `command` fail with `EngineError::Rejected`
    pub async fn fail_on(&self, command: EngineCommand) {
        self.inner.lock().await.failing.insert(command);
    }

    /// Stop injecting failures
    pub async fn clear_failures(&self) {
        self.inner.lock().await.failing.clear();
    }

    /// Every call received so far, queries included, in arrival order
    pub async fn command_log(&self) -> Vec<EngineCommand> {
        self.inner.lock().await.log.clone()
    }

    /// Mutating calls received so far, in arrival order
    pub async fn mutation_log(&self) -> Vec<EngineCommand> {
        self.inner
            .lock()
            .await
            .log
            .iter()
            .copied()
            .filter(EngineCommand::is_mutation)
            .collect()
    }

    pub async fn clear_log(&self) {
        self.inner.lock().await.log.clear();
    }

    /// Options passed to the last `configure` call
    pub async fn options(&self) -> Option<EngineOptions> {
        self.inner.lock().await.options.clone()
    }

    /// Let `elapsed` of playback time pass
    ///
    /// Does nothing unless the engine is playing. Tracks with unknown
    /// duration never finish.
    pub async fn advance_clock(&self, elapsed: Duration) {
        let mut engine = self.inner.lock().await;
        if !engine.state.is_playing() {
            return;
        }

        let mut remaining = elapsed;
        loop {
            let duration = engine.active_duration();
            let position = engine.position.saturating_add(remaining);

            if duration.is_zero() || position < duration {
                engine.position = position;
                break;
            }

            remaining = position - duration;
            if !engine.finish_track() {
                break;
            }

            // At a track start: whole repeat cycles land back here
            if let Some(cycle) = engine.repeat_cycle() {
                remaining = wrap_duration(remaining, cycle);
            }
        }
    }

    /// Record the call, apply latency and injected failures
    async fn enter(&self, command: EngineCommand) -> EngineResult<MutexGuard<'_, EngineState>> {
        if command.is_mutation() && !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut engine = self.inner.lock().await;
        engine.log.push(command);

        if engine.failing.contains(&command) {
            return Err(EngineError::rejected(format!("{command} failed")));
        }
        Ok(engine)
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioEngine for MemoryEngine {
    async fn configure(&self, options: &EngineOptions) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::Configure).await?;
        engine.options = Some(options.clone());
        Ok(())
    }

    async fn reset_queue(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::ResetQueue).await?;
        engine.queue.clear();
        engine.active = None;
        engine.position = Duration::ZERO;
        engine.state = PlaybackState::None;
        Ok(())
    }

    async fn add_tracks(&self, tracks: &[Track]) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::AddTracks).await?;
        engine.queue.extend_from_slice(tracks);

        if engine.active.is_none() && !engine.queue.is_empty() {
            engine.jump(0);
            engine.state = PlaybackState::Ready;
        }
        Ok(())
    }

    async fn queue(&self) -> EngineResult<Vec<Track>> {
        let engine = self.enter(EngineCommand::Queue).await?;
        Ok(engine.queue.clone())
    }

    async fn active_index(&self) -> EngineResult<Option<usize>> {
        let engine = self.enter(EngineCommand::ActiveIndex).await?;
        Ok(engine.active)
    }

    async fn active_track(&self) -> EngineResult<Option<Track>> {
        let engine = self.enter(EngineCommand::ActiveTrack).await?;
        Ok(engine.active.and_then(|i| engine.queue.get(i)).cloned())
    }

    async fn play(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::Play).await?;
        engine.require_active()?;

        if engine.state == PlaybackState::Ended {
            engine.position = Duration::ZERO;
        }
        engine.state = PlaybackState::Playing;
        Ok(())
    }

    async fn pause(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::Pause).await?;
        if engine.active.is_some() {
            engine.state = PlaybackState::Paused;
        }
        Ok(())
    }

    async fn stop(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::Stop).await?;
        if engine.active.is_some() {
            engine.state = PlaybackState::Stopped;
            engine.position = Duration::ZERO;
        }
        Ok(())
    }

    async fn skip_next(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::SkipNext).await?;
        let index = engine.require_active()?;
        let len = engine.queue.len();

        if index + 1 < len {
            engine.jump(index + 1);
        } else if engine.repeat == RepeatMode::Queue {
            engine.jump(0);
        } else {
            return Err(EngineError::NoTrack);
        }
        Ok(())
    }

    async fn skip_previous(&self) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::SkipPrevious).await?;
        let index = engine.require_active()?;
        let len = engine.queue.len();

        if index > 0 {
            engine.jump(index - 1);
        } else if engine.repeat == RepeatMode::Queue {
            engine.jump(len - 1);
        } else {
            return Err(EngineError::NoTrack);
        }
        Ok(())
    }

    async fn seek(&self, position: Duration) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::Seek).await?;
        engine.require_active()?;

        let duration = engine.active_duration();
        engine.position = if duration.is_zero() {
            position
        } else {
            position.min(duration)
        };
        Ok(())
    }

    async fn playback_state(&self) -> EngineResult<PlaybackState> {
        let engine = self.enter(EngineCommand::PlaybackState).await?;
        Ok(engine.state)
    }

    async fn progress(&self) -> EngineResult<Progress> {
        let engine = self.enter(EngineCommand::Progress).await?;
        Ok(Progress::new(engine.position, engine.active_duration()))
    }

    async fn set_volume(&self, volume: f32) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::SetVolume).await?;
        if volume.is_nan() {
            return Err(EngineError::rejected("volume is NaN"));
        }
        engine.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    async fn volume(&self) -> EngineResult<f32> {
        let engine = self.enter(EngineCommand::Volume).await?;
        Ok(engine.volume)
    }

    async fn set_repeat_mode(&self, mode: RepeatMode) -> EngineResult<()> {
        let mut engine = self.enter(EngineCommand::SetRepeatMode).await?;
        engine.repeat = mode;
        Ok(())
    }

    async fn repeat_mode(&self) -> EngineResult<RepeatMode> {
        let engine = self.enter(EngineCommand::RepeatMode).await?;
        Ok(engine.repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str, secs: u64) -> Track {
        Track::new(format!("u:{}", id), id, "Test Artist").with_duration(Duration::from_secs(secs))
    }

    async fn loaded_engine() -> MemoryEngine {
        let engine = MemoryEngine::new();
        engine
            .add_tracks(&[
                create_test_track("a", 100),
                create_test_track("b", 100),
                create_test_track("c", 100),
            ])
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn add_tracks_activates_first() {
        let engine = loaded_engine().await;
        assert_eq!(engine.active_index().await.unwrap(), Some(0));
        assert_eq!(engine.playback_state().await.unwrap(), PlaybackState::Ready);
    }

    #[tokio::test]
    async fn skip_next_stops_at_end_without_queue_repeat() {
        let engine = loaded_engine().await;
        engine.skip_next().await.unwrap();
        engine.skip_next().await.unwrap();

        assert_eq!(engine.skip_next().await, Err(EngineError::NoTrack));
        assert_eq!(engine.active_index().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn skips_wrap_under_queue_repeat() {
        let engine = loaded_engine().await;
        engine.set_repeat_mode(RepeatMode::Queue).await.unwrap();

        engine.skip_previous().await.unwrap();
        assert_eq!(engine.active_index().await.unwrap(), Some(2));

        engine.skip_next().await.unwrap();
        assert_eq!(engine.active_index().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn skip_previous_at_start_fails_without_queue_repeat() {
        let engine = loaded_engine().await;
        assert_eq!(engine.skip_previous().await, Err(EngineError::NoTrack));
    }

    #[tokio::test]
    async fn clock_applies_repeat_modes() {
        let engine = loaded_engine().await;
        engine.play().await.unwrap();

        // Off: 250s runs through a, b and half of c
        engine.advance_clock(Duration::from_secs(250)).await;
        assert_eq!(engine.active_index().await.unwrap(), Some(2));
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(50));

        // Track: c restarts instead of moving on
        engine.set_repeat_mode(RepeatMode::Track).await.unwrap();
        engine.advance_clock(Duration::from_secs(60)).await;
        assert_eq!(engine.active_index().await.unwrap(), Some(2));
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(10));

        // Queue: wraps back to a
        engine.set_repeat_mode(RepeatMode::Queue).await.unwrap();
        engine.advance_clock(Duration::from_secs(95)).await;
        assert_eq!(engine.active_index().await.unwrap(), Some(0));
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn clock_ends_queue_when_repeat_off() {
        let engine = loaded_engine().await;
        engine.play().await.unwrap();

        engine.advance_clock(Duration::from_secs(1000)).await;

        assert_eq!(engine.playback_state().await.unwrap(), PlaybackState::Ended);
        assert_eq!(engine.active_index().await.unwrap(), Some(2));
        assert_eq!(engine.progress().await.unwrap().fraction(), 1.0);
    }

    #[tokio::test]
    async fn huge_tick_does_not_overflow() {
        let engine = loaded_engine().await;
        engine.play().await.unwrap();
        engine.advance_clock(Duration::from_secs(10)).await;

        engine.advance_clock(Duration::MAX).await;

        assert_eq!(engine.playback_state().await.unwrap(), PlaybackState::Ended);
        assert_eq!(engine.active_index().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn huge_tick_under_repeat_stays_in_range() {
        for mode in [RepeatMode::Track, RepeatMode::Queue] {
            let engine = loaded_engine().await;
            engine.set_repeat_mode(mode).await.unwrap();
            engine.play().await.unwrap();
            engine.advance_clock(Duration::from_secs(10)).await;

            engine.advance_clock(Duration::MAX).await;

            assert!(engine.playback_state().await.unwrap().is_playing());
            assert!(engine.progress().await.unwrap().position < Duration::from_secs(100));
        }
    }

    #[tokio::test]
    async fn long_tick_skips_whole_queue_cycles() {
        let engine = loaded_engine().await;
        engine.set_repeat_mode(RepeatMode::Queue).await.unwrap();
        engine.play().await.unwrap();

        // 10^12 full 300s laps plus 50s
        engine
            .advance_clock(Duration::from_secs(300_000_000_000_000 + 50))
            .await;

        assert_eq!(engine.active_index().await.unwrap(), Some(0));
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(50));
    }

    #[tokio::test]
    async fn long_tick_under_track_repeat_keeps_track() {
        let engine = loaded_engine().await;
        engine.set_repeat_mode(RepeatMode::Track).await.unwrap();
        engine.skip_next().await.unwrap();
        engine.play().await.unwrap();

        engine
            .advance_clock(Duration::from_secs(100_000_000_000_000 + 30))
            .await;

        assert_eq!(engine.active_index().await.unwrap(), Some(1));
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(30));
    }

    #[test]
    fn wrap_duration_is_remainder() {
        assert_eq!(
            wrap_duration(Duration::from_millis(2_500), Duration::from_secs(1)),
            Duration::from_millis(500)
        );
        assert_eq!(
            wrap_duration(Duration::MAX, Duration::from_secs(1)),
            Duration::from_nanos(999_999_999)
        );
    }

    #[tokio::test]
    async fn clock_is_frozen_while_paused() {
        let engine = loaded_engine().await;
        engine.advance_clock(Duration::from_secs(30)).await;
        assert_eq!(engine.progress().await.unwrap().position, Duration::ZERO);
    }

    #[tokio::test]
    async fn injected_failure_is_logged_and_reported() {
        let engine = loaded_engine().await;
        engine.fail_on(EngineCommand::Play).await;

        assert!(matches!(engine.play().await, Err(EngineError::Rejected(_))));
        assert_eq!(engine.mutation_log().await.last(), Some(&EngineCommand::Play));

        engine.clear_failures().await;
        assert!(engine.play().await.is_ok());
    }

    #[tokio::test]
    async fn seek_clamps_to_duration() {
        let engine = loaded_engine().await;
        engine.seek(Duration::from_secs(500)).await.unwrap();
        assert_eq!(engine.progress().await.unwrap().position, Duration::from_secs(100));
    }
}
