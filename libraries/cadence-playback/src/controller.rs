//! Playback controller - command/query façade over an audio engine
//!
//! Translates user gestures (pick a track from a listing, toggle repeat,
//! shuffle, skip, mute) into ordered engine command sequences. The engine is
//! the source of truth: every read goes back to it, and the controller keeps
//! nothing but a guard against overlapping queue rebuilds.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use cadence_core::{
    AudioEngine, Catalog, EngineCommand, EngineResult, Listing, PlaybackState, Progress,
    RepeatMode, Track,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::{PlaybackError, Result},
    events::{EventBus, PlayerEvent, EVENT_CHANNEL_CAPACITY},
    queue::rotate_to_front,
    shuffle::shuffled,
    types::{Direction, PlayerSetup, PlayerStatus},
    volume::Volume,
};

/// Await one engine call, tagging a failure with the command that caused it
async fn run<T, F>(command: EngineCommand, call: F) -> Result<T>
where
    F: Future<Output = EngineResult<T>>,
{
    call.await
        .map_err(|source| PlaybackError::engine(command, source))
}

/// Held while a queue rebuild is being applied to the engine
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { flag })
            .map_err(|_| PlaybackError::CommandInFlight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Playback queue controller
///
/// Owns its engine handle. Operations take `&self` so the controller can be
/// shared (for example behind an `Arc`) between UI callbacks; queue rebuilds
/// (`select_track`, `shuffle`) refuse to overlap and fail fast with
/// [`PlaybackError::CommandInFlight`].
pub struct PlaybackController<E> {
    engine: E,
    in_flight: AtomicBool,
    events: EventBus,
}

impl<E: AudioEngine> PlaybackController<E> {
    /// Create a controller around an engine handle
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            in_flight: AtomicBool::new(false),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
        }
    }

    /// Borrow the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Give the engine back
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Whether a queue rebuild is currently being applied
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ===== Setup =====

    /// Configure the engine and apply the initial volume and repeat mode
    pub async fn setup(&self, setup: &PlayerSetup) -> Result<()> {
        let volume = Volume::try_new(setup.initial_volume)
            .ok_or(PlaybackError::InvalidVolume(setup.initial_volume))?;

        let result = self.apply_setup(setup, volume).await;
        self.settle("setup", result).await
    }

    async fn apply_setup(&self, setup: &PlayerSetup, volume: Volume) -> Result<()> {
        run(EngineCommand::Configure, self.engine.configure(&setup.engine)).await?;
        run(EngineCommand::SetVolume, self.engine.set_volume(volume.level())).await?;
        run(
            EngineCommand::SetRepeatMode,
            self.engine.set_repeat_mode(setup.initial_repeat_mode),
        )
        .await?;

        info!(
            "Player set up: volume {}%, repeat {}, cache {} KB",
            volume.percent(),
            setup.initial_repeat_mode,
            setup.engine.max_cache_size_kb
        );
        Ok(())
    }

    // ===== Queue =====

    /// Play `selected` and queue the rest of `listing` behind it
    ///
    /// The engine queue becomes `[selected, after.., before..]` and playback
    /// starts at index 0. The previous queue is discarded, not merged.
    ///
    /// If `selected` is not in `listing` nothing is sent to the engine and
    /// [`PlaybackError::TrackNotFoundInListing`] is returned.
    pub async fn select_track(&self, listing: &Listing, selected: &Track) -> Result<Vec<Track>> {
        let result = self.replace_with_selection(listing, selected).await;
        self.settle("select_track", result).await
    }

    /// Look up a listing by name and play one of its tracks
    pub async fn select_from_catalog(
        &self,
        catalog: &Catalog,
        listing_name: &str,
        url: &str,
    ) -> Result<Vec<Track>> {
        let listing = catalog
            .listing(listing_name)
            .ok_or_else(|| PlaybackError::ListingNotFound(listing_name.to_string()))?;
        let selected = listing
            .find(url)
            .ok_or_else(|| PlaybackError::TrackNotFoundInListing {
                url: url.to_string(),
            })?;

        self.select_track(listing, selected).await
    }

    async fn replace_with_selection(&self, listing: &Listing, selected: &Track) -> Result<Vec<Track>> {
        let Some(rotated) = rotate_to_front(&listing.tracks, &selected.url) else {
            warn!(
                "Track {} is not in listing \"{}\", queue left unchanged",
                selected.url, listing.name
            );
            return Err(PlaybackError::TrackNotFoundInListing {
                url: selected.url.clone(),
            });
        };

        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        // Order matters: reset, selected, after, before, play
        run(EngineCommand::ResetQueue, self.engine.reset_queue()).await?;
        run(
            EngineCommand::AddTracks,
            self.engine.add_tracks(std::slice::from_ref(&rotated.selected)),
        )
        .await?;
        if !rotated.after.is_empty() {
            run(EngineCommand::AddTracks, self.engine.add_tracks(&rotated.after)).await?;
        }
        if !rotated.before.is_empty() {
            run(EngineCommand::AddTracks, self.engine.add_tracks(&rotated.before)).await?;
        }
        run(EngineCommand::Play, self.engine.play()).await?;

        let queue = rotated.into_tracks();
        info!(
            "Queue replaced from \"{}\": {} tracks starting at {}",
            listing.name,
            queue.len(),
            selected.url
        );
        self.events.publish(PlayerEvent::QueueReplaced {
            length: queue.len(),
            active_index: Some(0),
        });

        Ok(queue)
    }

    /// Reorder the current queue randomly, once, and play from the top
    ///
    /// Shuffle is not a mode: calling it again permutes the queue as it is
    /// now, and tracks added later are not shuffled. Queues of length 0 or 1
    /// are returned unchanged without touching the engine.
    pub async fn shuffle(&self) -> Result<Vec<Track>> {
        let result = self.replace_with_shuffle().await;
        self.settle("shuffle", result).await
    }

    async fn replace_with_shuffle(&self) -> Result<Vec<Track>> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let current = run(EngineCommand::Queue, self.engine.queue()).await?;
        if current.len() <= 1 {
            debug!("Shuffle skipped: queue has {} track(s)", current.len());
            return Ok(current);
        }

        let queue = shuffled(&current);

        run(EngineCommand::ResetQueue, self.engine.reset_queue()).await?;
        run(EngineCommand::AddTracks, self.engine.add_tracks(&queue)).await?;
        run(EngineCommand::Play, self.engine.play()).await?;

        info!("Queue shuffled: {} tracks", queue.len());
        self.events.publish(PlayerEvent::QueueReplaced {
            length: queue.len(),
            active_index: Some(0),
        });

        Ok(queue)
    }

    /// Full engine queue in play order
    pub async fn queue(&self) -> Result<Vec<Track>> {
        run(EngineCommand::Queue, self.engine.queue()).await
    }

    // ===== Repeat =====

    /// Move the engine to the next repeat mode (`Off -> Track -> Queue -> Off`)
    ///
    /// The current mode is read from the engine, never assumed. With an
    /// empty queue nothing changes and the current mode is returned.
    pub async fn cycle_repeat_mode(&self) -> Result<RepeatMode> {
        let result = self.apply_next_repeat_mode().await;
        self.settle("cycle_repeat_mode", result).await
    }

    async fn apply_next_repeat_mode(&self) -> Result<RepeatMode> {
        let current = run(EngineCommand::RepeatMode, self.engine.repeat_mode()).await?;

        if !self.has_active_track().await? {
            debug!("Repeat toggle ignored: queue is empty");
            return Ok(current);
        }

        let next = current.cycle();
        self.apply_repeat_mode(next).await?;
        Ok(next)
    }

    /// Set an explicit repeat mode
    pub async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        let result = self.apply_repeat_mode(mode).await;
        self.settle("set_repeat_mode", result).await
    }

    async fn apply_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        run(EngineCommand::SetRepeatMode, self.engine.set_repeat_mode(mode)).await?;
        debug!("Repeat mode set to {} ({})", mode, mode.label());
        self.events.publish(PlayerEvent::RepeatModeChanged { mode });
        Ok(())
    }

    pub async fn repeat_mode(&self) -> Result<RepeatMode> {
        run(EngineCommand::RepeatMode, self.engine.repeat_mode()).await
    }

    // ===== Navigation =====

    /// Skip forward or backward and return the track the engine now reports
    ///
    /// What happens at either end of the queue is up to the engine and its
    /// repeat mode. With an empty queue this is a no-op.
    pub async fn advance(&self, direction: Direction) -> Result<Option<Track>> {
        let result = self.skip(direction).await;
        self.settle("advance", result).await
    }

    async fn skip(&self, direction: Direction) -> Result<Option<Track>> {
        if !self.has_active_track().await? {
            debug!("Skip {:?} ignored: queue is empty", direction);
            return Ok(None);
        }

        match direction {
            Direction::Next => run(EngineCommand::SkipNext, self.engine.skip_next()).await?,
            Direction::Previous => {
                run(EngineCommand::SkipPrevious, self.engine.skip_previous()).await?;
            }
        }

        run(EngineCommand::ActiveTrack, self.engine.active_track()).await
    }

    pub async fn next(&self) -> Result<Option<Track>> {
        self.advance(Direction::Next).await
    }

    pub async fn previous(&self) -> Result<Option<Track>> {
        self.advance(Direction::Previous).await
    }

    // ===== Transport =====

    pub async fn play(&self) -> Result<()> {
        let result = run(EngineCommand::Play, self.engine.play()).await;
        self.settle("play", result).await
    }

    pub async fn pause(&self) -> Result<()> {
        let result = run(EngineCommand::Pause, self.engine.pause()).await;
        self.settle("pause", result).await
    }

    pub async fn stop(&self) -> Result<()> {
        let result = run(EngineCommand::Stop, self.engine.stop()).await;
        self.settle("stop", result).await
    }

    /// Pause if the engine is playing, play otherwise
    ///
    /// Returns whether playback is now running.
    pub async fn toggle_play_pause(&self) -> Result<bool> {
        let result = self.flip_playback().await;
        self.settle("toggle_play_pause", result).await
    }

    async fn flip_playback(&self) -> Result<bool> {
        let playing = run(EngineCommand::PlaybackState, self.engine.playback_state())
            .await?
            .is_playing();

        if playing {
            run(EngineCommand::Pause, self.engine.pause()).await?;
        } else {
            run(EngineCommand::Play, self.engine.play()).await?;
        }

        self.events
            .publish(PlayerEvent::PlaybackToggled { playing: !playing });
        Ok(!playing)
    }

    /// Seek within the active track
    pub async fn seek(&self, position: Duration) -> Result<()> {
        let result = run(EngineCommand::Seek, self.engine.seek(position)).await;
        self.settle("seek", result).await
    }

    /// Seek to a fraction (0.0-1.0) of the active track, as a slider does
    ///
    /// No-op when nothing is loaded or the duration is unknown.
    pub async fn seek_to_fraction(&self, fraction: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PlaybackError::InvalidSeekFraction(fraction));
        }

        let result = self.seek_fraction(fraction).await;
        self.settle("seek_to_fraction", result).await
    }

    async fn seek_fraction(&self, fraction: f32) -> Result<()> {
        if !self.has_active_track().await? {
            debug!("Seek ignored: queue is empty");
            return Ok(());
        }

        let progress = run(EngineCommand::Progress, self.engine.progress()).await?;
        if progress.duration.is_zero() {
            debug!("Seek ignored: duration unknown");
            return Ok(());
        }

        let target = progress.duration.mul_f32(fraction);
        run(EngineCommand::Seek, self.engine.seek(target)).await
    }

    // ===== Volume =====

    /// Mute, or unmute to full volume
    ///
    /// Returns whether audio is now muted. Unmuting does not restore the
    /// level that was set before muting.
    pub async fn toggle_mute(&self) -> Result<bool> {
        let result = self.flip_mute().await;
        self.settle("toggle_mute", result).await
    }

    async fn flip_mute(&self) -> Result<bool> {
        let current = Volume::new(run(EngineCommand::Volume, self.engine.volume()).await?);
        let target = current.toggled_mute();

        run(EngineCommand::SetVolume, self.engine.set_volume(target.level())).await?;

        self.events.publish(PlayerEvent::VolumeChanged {
            volume: target.level(),
            muted: target.is_muted(),
        });
        Ok(target.is_muted())
    }

    /// Set the output volume, clamped to 0.0-1.0
    ///
    /// Returns the level actually applied.
    pub async fn set_volume(&self, level: f32) -> Result<f32> {
        let volume = Volume::try_new(level).ok_or(PlaybackError::InvalidVolume(level))?;

        let result = run(EngineCommand::SetVolume, self.engine.set_volume(volume.level())).await;
        self.settle("set_volume", result).await?;

        self.events.publish(PlayerEvent::VolumeChanged {
            volume: volume.level(),
            muted: volume.is_muted(),
        });
        Ok(volume.level())
    }

    pub async fn volume(&self) -> Result<f32> {
        run(EngineCommand::Volume, self.engine.volume()).await
    }

    pub async fn is_muted(&self) -> Result<bool> {
        Ok(Volume::new(self.volume().await?).is_muted())
    }

    // ===== Status =====

    pub async fn active_track(&self) -> Result<Option<Track>> {
        run(EngineCommand::ActiveTrack, self.engine.active_track()).await
    }

    pub async fn active_index(&self) -> Result<Option<usize>> {
        run(EngineCommand::ActiveIndex, self.engine.active_index()).await
    }

    pub async fn progress(&self) -> Result<Progress> {
        run(EngineCommand::Progress, self.engine.progress()).await
    }

    pub async fn playback_state(&self) -> Result<PlaybackState> {
        run(EngineCommand::PlaybackState, self.engine.playback_state()).await
    }

    /// Whether the engine has an active track (its queue is not empty)
    async fn has_active_track(&self) -> Result<bool> {
        Ok(self.active_index().await?.is_some())
    }

    pub async fn is_playing(&self) -> Result<bool> {
        Ok(self.playback_state().await?.is_playing())
    }

    /// Read a full status snapshot from the engine
    pub async fn status(&self) -> Result<PlayerStatus> {
        Ok(PlayerStatus {
            active_track: self.active_track().await?,
            active_index: self.active_index().await?,
            queue_length: self.queue().await?.len(),
            progress: self.progress().await?,
            repeat_mode: self.repeat_mode().await?,
            state: self.playback_state().await?,
            volume: self.volume().await?,
        })
    }

    // ===== Failure handling =====

    /// Report an engine failure: log, re-read engine state, notify the UI
    ///
    /// The engine's state after a failed sequence is whatever it reports.
    /// Nothing is retried; a caller that wants the intended queue must issue
    /// the whole operation again.
    async fn settle<T>(&self, operation: &'static str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_engine_failure() {
                warn!("{} aborted: {}", operation, err);
                self.resync(operation).await;
                self.events.publish(PlayerEvent::Notice {
                    message: err.notice(),
                });
            }
        }
        result
    }

    async fn resync(&self, operation: &'static str) {
        match (self.engine.queue().await, self.engine.active_index().await) {
            (Ok(queue), Ok(index)) => debug!(
                "Engine after failed {}: {} tracks, active index {:?}",
                operation,
                queue.len(),
                index
            ),
            (Err(err), _) | (_, Err(err)) => {
                warn!("Engine status unavailable after failed {}: {}", operation, err);
            }
        }
    }
}
