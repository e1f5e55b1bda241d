//! Playback session controller - core orchestration
//!
//! Owns what is currently sounding, how the queue snapshot is traversed and
//! how end-of-track is resolved. One instance per listening session; the UI
//! holds it and feeds it transport calls and media callbacks in the order
//! they happen.
//!
//! ```text
//! Idle ──select──▶ Loading ──Ready──▶ Playing ◀──play── Paused
//!                    ▲   │                │ └──pause──▶   ▲
//!                    │   └──Failed──▶ Ended               │
//!                    │                    │ Ended         │
//!                    └── Restart/Advance ─┴──── Stop ─────┘
//! ```
//!
//! Any state accepts a selection and goes straight to `Loading`.

use crate::{
    error::{PlaybackError, Result},
    events::{LoadToken, MediaEvent, PlaybackEvent},
    queue::{self, EndAction, Step},
    types::{PlaybackConfig, RepeatMode, SessionState, ShuffleMode, Transport},
    volume::Volume,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};
use tunebox_core::{CatalogService, Track, TrackId};

/// Central playback session state
///
/// Plays are reported to the catalog in the background when a freshly
/// selected track starts sounding. Reports never block transport calls; call
/// [`poll_play_counts`](Self::poll_play_counts) or
/// [`flush_play_counts`](Self::flush_play_counts) to fold the server's
/// updated counts back into the queue snapshot.
pub struct PlaybackSessionController {
    catalog: Arc<dyn CatalogService>,

    // Session
    queue: Vec<Track>,
    current: Option<usize>,
    state: SessionState,
    elapsed: Duration,
    last_error: Option<PlaybackError>,

    // Load bookkeeping
    token: LoadToken,
    count_on_ready: bool,
    // Parked at the top of the track; resuming must reload it
    rewound: bool,

    // Settings
    repeat: RepeatMode,
    shuffle: ShuffleMode,
    volume: Volume,
    rng: StdRng,

    // Background play-count reports
    play_counts: JoinSet<Option<Track>>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackSessionController {
    /// Create a new controller with an empty queue
    pub fn new(catalog: Arc<dyn CatalogService>, config: PlaybackConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog,
            queue: Vec::new(),
            current: None,
            state: SessionState::Idle,
            elapsed: Duration::ZERO,
            last_error: None,
            token: LoadToken::default(),
            count_on_ready: false,
            rewound: false,
            repeat: config.repeat,
            shuffle: config.shuffle,
            volume: Volume::new(config.volume),
            rng,
            play_counts: JoinSet::new(),
            pending_events: Vec::new(),
        }
    }

    // ===== Queue =====

    /// Replace the queue snapshot
    ///
    /// Ends the current session: nothing is selected afterwards and any
    /// outstanding media callback becomes stale.
    pub fn load_queue(&mut self, tracks: Vec<Track>) {
        self.reset_session();
        self.queue = tracks;
        info!(length = self.queue.len(), "Queue snapshot loaded");
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
        self.emit(PlaybackEvent::StateChanged {
            state: SessionState::Idle,
        });
    }

    /// Replace the queue snapshot and start playing at `index`
    pub fn play_from(&mut self, tracks: Vec<Track>, index: usize) -> Result<LoadToken> {
        self.load_queue(tracks);
        self.select_index(index)
    }

    /// Drop the queue and all session state (logout)
    pub fn reset(&mut self) {
        self.reset_session();
        self.queue.clear();
        self.emit(PlaybackEvent::QueueChanged { length: 0 });
        self.emit(PlaybackEvent::StateChanged {
            state: SessionState::Idle,
        });
    }

    // ===== Transport =====

    /// User picked a track from the queue by position
    ///
    /// Always honored, from any state. Supersedes any load still in flight.
    pub fn select_index(&mut self, index: usize) -> Result<LoadToken> {
        if self.queue.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }
        if index >= self.queue.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        Ok(self.begin_load(index, true))
    }

    /// User picked a track from the queue by ID
    pub fn select_track(&mut self, id: &TrackId) -> Result<LoadToken> {
        let index = self
            .queue
            .iter()
            .position(|track| &track.id == id)
            .ok_or_else(|| PlaybackError::TrackNotInQueue(id.clone()))?;
        self.select_index(index)
    }

    /// Start or resume playback
    ///
    /// Resumes a paused track where it stopped. A session parked at the end
    /// of the queue reloads its track from the top without counting it
    /// again. After a media failure this asks the media element to try the
    /// same track once more.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            SessionState::Paused if self.rewound => {
                let index = self.current.ok_or(PlaybackError::NoTrackLoaded)?;
                self.begin_load(index, false);
                Ok(())
            }
            SessionState::Paused => {
                self.set_state(SessionState::Playing);
                Ok(())
            }
            SessionState::Ended => {
                let index = self.current.ok_or(PlaybackError::NoTrackLoaded)?;
                let count_on_ready = self.count_on_ready;
                self.begin_load(index, count_on_ready);
                Ok(())
            }
            SessionState::Idle => Err(PlaybackError::NoTrackLoaded),
            SessionState::Playing | SessionState::Loading => Ok(()),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == SessionState::Playing {
            self.set_state(SessionState::Paused);
        }
    }

    /// Play/pause button
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state == SessionState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Skip forward
    ///
    /// Returns `None` when the queue has run out (last track, no repeat);
    /// the current track is left untouched in that case.
    ///
    /// A skip that lands on the current track (repeat-one on the last track,
    /// or a shuffle pick of the same index) restarts it and is not counted
    /// as a new play.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<LoadToken>> {
        let current = self.current.ok_or(PlaybackError::NoTrackLoaded)?;
        let step = queue::next_index(
            self.queue.len(),
            current,
            self.repeat,
            self.shuffle,
            &mut self.rng,
        );

        match step {
            Step::Index(index) => Ok(Some(self.begin_load(index, index != current))),
            Step::Stop => {
                debug!(index = current, "Skip ignored: end of queue");
                Ok(None)
            }
        }
    }

    /// Skip back
    ///
    /// Landing on the current track (single-track queue, shuffle pick)
    /// restarts it without counting, like [`next`](Self::next).
    pub fn previous(&mut self) -> Result<LoadToken> {
        let current = self.current.ok_or(PlaybackError::NoTrackLoaded)?;
        let index = queue::previous_index(self.queue.len(), current, self.shuffle, &mut self.rng)
            .ok_or(PlaybackError::QueueEmpty)?;
        Ok(self.begin_load(index, index != current))
    }

    /// Seek within the current track
    ///
    /// Only valid while playing or paused mid-track. The position is
    /// clamped to the track duration; the clamped value is returned.
    ///
    /// A session parked at the end of the queue has nothing loaded to seek
    /// in; [`play`](Self::play) reloads the track first.
    pub fn seek(&mut self, position: Duration) -> Result<Duration> {
        if !matches!(self.state, SessionState::Playing | SessionState::Paused) {
            return Err(PlaybackError::InvalidOperation(format!(
                "cannot seek while {:?}",
                self.state
            )));
        }
        if self.rewound {
            return Err(PlaybackError::InvalidOperation(
                "cannot seek a stopped track; play it first".to_string(),
            ));
        }

        let duration = self
            .current_track()
            .map(Track::duration)
            .ok_or(PlaybackError::NoTrackLoaded)?;
        let position = position.min(duration);

        self.elapsed = position;
        self.emit(PlaybackEvent::Seeked { position });
        Ok(position)
    }

    /// Seek to a fraction of the current track (0.0 - 1.0)
    pub fn seek_to_percent(&mut self, percent: f64) -> Result<Duration> {
        let duration = self
            .current_track()
            .map(Track::duration)
            .ok_or(PlaybackError::NoTrackLoaded)?;
        let percent = if percent.is_finite() {
            percent.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.seek(duration.mul_f64(percent))
    }

    // ===== Media callbacks =====

    /// Feed a media element callback into the state machine
    ///
    /// Callbacks carrying anything but the latest load token are dropped.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if event.token() != self.token {
            debug!(
                token = %event.token(),
                live = %self.token,
                "Dropping stale media callback"
            );
            return;
        }

        match event {
            MediaEvent::Ready { .. } => self.on_media_ready(),
            MediaEvent::TimeUpdate { position, .. } => self.on_time_update(position),
            MediaEvent::Ended { .. } => self.on_natural_end(),
            MediaEvent::Failed { reason, .. } => self.on_media_failed(reason),
        }
    }

    fn on_media_ready(&mut self) {
        if self.state != SessionState::Loading {
            debug!(state = ?self.state, "Ready outside Loading ignored");
            return;
        }

        self.elapsed = Duration::ZERO;
        self.set_state(SessionState::Playing);

        if self.count_on_ready {
            self.count_on_ready = false;
            if let Some(track) = self.current_track() {
                let id = track.id.clone();
                self.report_play(id);
            }
        }
    }

    fn on_time_update(&mut self, position: Duration) {
        if self.state != SessionState::Playing {
            return;
        }
        let duration = self.current_track().map_or(Duration::ZERO, Track::duration);
        let position = position.min(duration);
        if position > self.elapsed {
            self.elapsed = position;
        }
    }

    fn on_natural_end(&mut self) {
        if self.state != SessionState::Playing {
            debug!(state = ?self.state, "End outside Playing ignored");
            return;
        }
        let Some(current) = self.current else {
            return;
        };

        if let Some(track) = self.current_track() {
            debug!(track_id = %track.id, "Track finished");
        }

        let action = queue::on_natural_end(
            self.queue.len(),
            current,
            self.repeat,
            self.shuffle,
            &mut self.rng,
        );

        match action {
            EndAction::Restart => {
                self.begin_load(current, false);
            }
            EndAction::Advance(index) => {
                self.begin_load(index, true);
            }
            EndAction::Stop => {
                info!(index = current, "End of queue");
                self.park(SessionState::Paused);
            }
        }
    }

    fn on_media_failed(&mut self, reason: String) {
        if !matches!(self.state, SessionState::Loading | SessionState::Playing) {
            return;
        }

        let track_id = self.current_track().map(|track| track.id.clone());
        warn!(track_id = ?track_id, reason = %reason, "Media failed to play");

        let error = PlaybackError::MediaLoad(reason);
        self.emit(PlaybackEvent::Error {
            message: error.to_string(),
        });
        self.last_error = Some(error);
        self.park(SessionState::Ended);
    }

    // ===== Play counts =====

    /// Fold finished play-count reports into the queue without waiting
    pub fn poll_play_counts(&mut self) {
        while let Some(result) = self.play_counts.try_join_next() {
            self.apply_play_count(result);
        }
    }

    /// Wait for every outstanding play-count report and fold them in
    pub async fn flush_play_counts(&mut self) {
        while let Some(result) = self.play_counts.join_next().await {
            self.apply_play_count(result);
        }
    }

    /// Number of play-count reports still in flight
    pub fn pending_play_counts(&self) -> usize {
        self.play_counts.len()
    }

    fn report_play(&mut self, id: TrackId) {
        let Ok(handle) = Handle::try_current() else {
            warn!(track_id = %id, "No async runtime; play not recorded");
            return;
        };

        debug!(track_id = %id, "Recording play");
        let catalog = Arc::clone(&self.catalog);
        self.play_counts.spawn_on(
            async move {
                match catalog.increment_play_count(&id).await {
                    Ok(track) => Some(track),
                    Err(e) => {
                        warn!(track_id = %id, error = %e, "Failed to record play");
                        None
                    }
                }
            },
            &handle,
        );
    }

    fn apply_play_count(&mut self, result: std::result::Result<Option<Track>, JoinError>) {
        let updated = match result {
            Ok(Some(track)) => track,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Play-count task did not complete");
                return;
            }
        };

        for track in self.queue.iter_mut().filter(|t| t.id == updated.id) {
            track.play_count = updated.play_count;
        }
        self.emit(PlaybackEvent::PlayCountUpdated {
            track_id: updated.id,
            play_count: updated.play_count,
        });
    }

    // ===== Shuffle & Repeat =====

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.emit_mode_changed();
    }

    /// Advance repeat mode in button order and return the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.repeat.cycle());
        self.repeat
    }

    /// Get current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Set shuffle mode
    pub fn set_shuffle(&mut self, mode: ShuffleMode) {
        self.shuffle = mode;
        self.emit_mode_changed();
    }

    /// Flip shuffle and return the new mode
    pub fn toggle_shuffle(&mut self) -> ShuffleMode {
        self.set_shuffle(self.shuffle.toggled());
        self.shuffle
    }

    /// Get current shuffle mode
    pub fn shuffle(&self) -> ShuffleMode {
        self.shuffle
    }

    // ===== Volume =====

    /// Set volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.emit_volume_changed();
    }

    /// Get current volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.emit_volume_changed();
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Value for the media element's `volume` property
    pub fn element_volume(&self) -> f64 {
        self.volume.element_volume()
    }

    // ===== State Queries =====

    /// Get current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get transport as shown on the play/pause button
    pub fn transport(&self) -> Transport {
        self.state.transport()
    }

    /// Position of the current track in the queue
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Get currently selected track
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|index| self.queue.get(index))
    }

    /// Queue snapshot
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Seconds into the current track
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed fraction of the current track (0.0 - 1.0)
    pub fn progress(&self) -> f64 {
        let duration = self.current_track().map_or(Duration::ZERO, Track::duration);
        if duration.is_zero() {
            0.0
        } else {
            (self.elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
        }
    }

    /// Why the session parked in `Ended`, if it did
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    /// Token of the latest load request
    pub fn load_token(&self) -> LoadToken {
        self.token
    }

    /// Whether the current track is first in the queue
    pub fn is_first(&self) -> bool {
        self.current == Some(0)
    }

    /// Whether the current track is last in the queue
    pub fn is_last(&self) -> bool {
        self.current
            .is_some_and(|index| index + 1 == self.queue.len())
    }

    /// Whether a forward skip would move
    pub fn has_next(&self) -> bool {
        self.current.is_some()
            && (!self.is_last() || self.repeat != RepeatMode::Off || self.shuffle.is_on())
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Point the session at `index` and ask the media element to load it
    fn begin_load(&mut self, index: usize, count_on_ready: bool) -> LoadToken {
        let previous_track_id = self.current_track().map(|track| track.id.clone());

        self.token = self.token.next();
        self.current = Some(index);
        self.elapsed = Duration::ZERO;
        self.count_on_ready = count_on_ready;
        self.rewound = false;
        self.last_error = None;

        let track = self.queue[index].clone();
        info!(
            track_id = %track.id,
            index,
            token = %self.token,
            "Loading track"
        );

        if previous_track_id.as_ref() != Some(&track.id) {
            self.emit(PlaybackEvent::TrackChanged {
                track_id: track.id.clone(),
                previous_track_id,
            });
        }
        self.emit(PlaybackEvent::LoadRequested {
            token: self.token,
            track,
        });
        self.set_state(SessionState::Loading);
        self.token
    }

    /// Stop on the current track, keeping the index
    fn park(&mut self, state: SessionState) {
        self.token = self.token.next();
        self.elapsed = Duration::ZERO;
        self.rewound = true;
        self.set_state(state);
    }

    fn reset_session(&mut self) {
        self.play_counts.detach_all();
        self.token = self.token.next();
        self.current = None;
        self.elapsed = Duration::ZERO;
        self.count_on_ready = false;
        self.rewound = false;
        self.last_error = None;
        self.state = SessionState::Idle;
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }

    fn emit_mode_changed(&mut self) {
        self.emit(PlaybackEvent::ModeChanged {
            repeat: self.repeat,
            shuffle: self.shuffle,
        });
    }

    fn emit_volume_changed(&mut self) {
        self.emit(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }
}
