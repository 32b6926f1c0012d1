use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tap::TapFallible;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::audio_output::{AudioOutput, OutputError};
use crate::dto::notification::Notification;
use crate::dto::player_event::PlayerEvent;
use crate::dto::player_state::PlayerState;
use crate::dto::repeat_mode::RepeatMode;
use crate::dto::snapshot::Snapshot;
use crate::dto::track::Track;
use crate::settings::Settings;
use crate::storage::StateStorage;
use crate::stream_counter::StreamCounter;

pub(crate) struct Player {
    queue: Vec<Track>,
    current_index: Option<usize>,
    // Track whose source is currently set on the output
    loaded_track: Option<String>,
    is_playing: bool,
    volume: u8,
    is_muted: bool,
    shuffle_enabled: bool,
    repeat_mode: RepeatMode,
    output: Box<dyn AudioOutput>,
    storage: Box<dyn StateStorage + Send + Sync>,
    stream_counter: Arc<dyn StreamCounter>,
    event_tx: broadcast::Sender<PlayerEvent>,
    rng: StdRng,
    settings: Settings,
}

impl Player {
    pub(crate) fn new(
        output: Box<dyn AudioOutput>,
        storage: Box<dyn StateStorage + Send + Sync>,
        stream_counter: Arc<dyn StreamCounter>,
        event_tx: broadcast::Sender<PlayerEvent>,
        settings: Settings,
    ) -> Self {
        let rng = match settings.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            queue: vec![],
            current_index: None,
            loaded_track: None,
            is_playing: false,
            volume: settings.default_volume.min(100),
            is_muted: false,
            shuffle_enabled: false,
            repeat_mode: RepeatMode::Off,
            output,
            storage,
            stream_counter,
            event_tx,
            rng,
            settings,
        }
    }

    pub(crate) fn status(&self) -> PlayerState {
        PlayerState {
            queue: self.queue.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
            current_time: self.output.current_time(),
            duration: self.output.duration(),
            volume: self.volume,
            is_muted: self.is_muted,
            shuffle_enabled: self.shuffle_enabled,
            repeat_mode: self.repeat_mode,
        }
    }

    fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    fn position_of(&self, track_id: &str) -> Option<usize> {
        self.queue.iter().position(|t| t.id == track_id)
    }

    fn notify(&self, notification: Notification) {
        info!("Notification: {notification}");
        self.event_tx
            .send(PlayerEvent::Notify(notification))
            .unwrap_or_default();
    }

    pub(crate) fn restore(&mut self) {
        if let Some(snapshot) = self.load_snapshot() {
            let selected_id = snapshot
                .selected_index()
                .map(|i| snapshot.queue[i].id.clone());

            let mut queue: Vec<Track> = Vec::with_capacity(snapshot.queue.len());
            for track in snapshot.queue {
                if !queue.iter().any(|t| t.id == track.id) {
                    queue.push(track);
                }
            }

            self.queue = queue;
            self.current_index = selected_id.and_then(|id| self.position_of(&id));
            self.volume = snapshot.volume.min(100);
            self.is_muted = snapshot.is_muted;
            self.shuffle_enabled = snapshot.shuffle_enabled;
            self.repeat_mode = snapshot.repeat_mode;
            info!(
                "Restored {} queued tracks. Current position: {:?}",
                self.queue.len(),
                self.current_index
            );
        }

        self.apply_volume();
        if let Some(track) = self.current_track().cloned() {
            // Load without playing, the previous session's audio can't be resumed
            self.load(&track);
        }
        self.event_tx
            .send(PlayerEvent::Restored(self.status()))
            .unwrap_or_default();
    }

    fn load_snapshot(&self) -> Option<Snapshot> {
        let contents = self
            .storage
            .get(&self.settings.storage_key)
            .tap_err(|e| error!("Error loading player state: {e:?}"))
            .ok()??;

        serde_json::from_str(&contents)
            .tap_err(|e| warn!("Discarding unreadable player state: {e}"))
            .ok()
    }

    pub(crate) fn persist(&self) {
        let snapshot = Snapshot {
            current_track: self.current_track().cloned(),
            queue: self.queue.clone(),
            volume: self.volume,
            is_muted: self.is_muted,
            shuffle_enabled: self.shuffle_enabled,
            repeat_mode: self.repeat_mode,
            current_index: self.current_index,
        };

        match serde_json::to_string(&snapshot) {
            Ok(contents) => {
                self.storage
                    .set(&self.settings.storage_key, &contents)
                    .tap_err(|e| error!("Error saving player state: {e:?}"))
                    .ok();
            }
            Err(e) => error!("Error serializing player state: {e}"),
        }
    }

    /// Sets the track's source on the output unless it's already loaded.
    fn load(&mut self, track: &Track) {
        if self.loaded_track.as_deref() == Some(track.id.as_str()) {
            debug!("{} is already loaded", track.title);
            return;
        }
        info!("Loading {}", track.audio_url);
        self.output.set_source(&track.audio_url);
        self.loaded_track = Some(track.id.clone());
    }

    fn apply_volume(&mut self) {
        let volume = if self.is_muted {
            0.0
        } else {
            f32::from(self.volume) / 100.0
        };
        self.output.set_volume(volume);
    }

    pub(crate) async fn play(&mut self, track: Track) -> Result<(), OutputError> {
        let index = match self.position_of(&track.id) {
            Some(index) => index,
            None => {
                info!("Adding {} to queue before playing", track.title);
                self.queue.push(track);
                self.queue.len() - 1
            }
        };
        self.play_index(index).await
    }

    async fn play_index(&mut self, index: usize) -> Result<(), OutputError> {
        let Some(track) = self.queue.get(index).cloned() else {
            debug!("Queue position {index} does not exist");
            return Ok(());
        };

        info!("Playing {} at queue position {index}", track.title);
        self.current_index = Some(index);
        self.load(&track);
        self.persist();

        match self.output.play().await {
            Ok(()) => {
                self.is_playing = true;
                self.count_stream(&track);
                self.event_tx
                    .send(PlayerEvent::Play(self.status()))
                    .unwrap_or_default();
                Ok(())
            }
            Err(e) => self.playback_failed(e),
        }
    }

    /// Moves to `index` from a navigation action. Landing on the current track starts it over.
    async fn skip_to(&mut self, index: usize) -> Result<(), OutputError> {
        if self.current_index == Some(index) {
            self.output.set_current_time(Duration::ZERO);
        }
        self.play_index(index).await
    }

    fn playback_failed(&mut self, err: OutputError) -> Result<(), OutputError> {
        error!("Error starting playback: {err}");
        self.is_playing = false;
        self.event_tx
            .send(PlayerEvent::PlayFailed(self.status(), err.clone()))
            .unwrap_or_default();
        Err(err)
    }

    fn count_stream(&self, track: &Track) {
        let stream_counter = self.stream_counter.clone();
        let track_id = track.id.clone();
        tokio::spawn(async move {
            stream_counter
                .increment(&track_id)
                .await
                .tap_err(|e| warn!("Error incrementing stream count for {track_id}: {e}"))
                .ok();
        });
    }

    pub(crate) fn add_to_queue(&mut self, track: Track) {
        if self.position_of(&track.id).is_some() {
            self.notify(Notification::Duplicate(track.title));
            return;
        }

        let title = track.title.clone();
        self.queue.push(track);
        self.persist();
        self.event_tx
            .send(PlayerEvent::QueueUpdated(self.status()))
            .unwrap_or_default();
        self.notify(Notification::Queued(title));
    }

    pub(crate) async fn play_from_queue(&mut self, index: usize) -> Result<(), OutputError> {
        if index >= self.queue.len() {
            debug!(
                "Ignoring play request for position {index}. Queue length: {}",
                self.queue.len()
            );
            return Ok(());
        }
        self.play_index(index).await
    }

    pub(crate) fn remove_from_queue(&mut self, index: usize) {
        if index >= self.queue.len() {
            debug!(
                "Ignoring remove request for position {index}. Queue length: {}",
                self.queue.len()
            );
            return;
        }
        if self.current_index == Some(index) && self.is_playing {
            self.notify(Notification::RemovalRefused);
            return;
        }

        let removed = self.queue.remove(index);
        info!("Removed {} from queue position {index}", removed.title);
        self.current_index = match self.current_index {
            Some(current) if index < current => Some(current - 1),
            Some(current) if index == current => {
                // The paused track went away, a later play must load from scratch
                self.loaded_track = None;
                None
            }
            current => current,
        };
        if self.queue.is_empty() {
            self.is_playing = false;
        }

        self.persist();
        self.event_tx
            .send(PlayerEvent::QueueUpdated(self.status()))
            .unwrap_or_default();
    }

    pub(crate) fn clear_queue(&mut self) {
        match self.current_track().cloned() {
            Some(track) => {
                self.queue = vec![track];
                self.current_index = Some(0);
            }
            None => {
                self.queue.clear();
                self.current_index = None;
                self.is_playing = false;
            }
        }

        self.persist();
        self.event_tx
            .send(PlayerEvent::QueueUpdated(self.status()))
            .unwrap_or_default();
        self.notify(Notification::QueueCleared);
    }

    pub(crate) async fn toggle_play_pause(&mut self) -> Result<(), OutputError> {
        let Some(index) = self.current_index else {
            if self.queue.is_empty() {
                info!("Queue is empty. Nothing to play.");
                return Ok(());
            }
            return self.play_index(0).await;
        };

        if self.is_playing {
            self.output.pause();
            self.is_playing = !self.output.is_paused();
            self.event_tx
                .send(PlayerEvent::Pause(self.status()))
                .unwrap_or_default();
            return Ok(());
        }

        let is_loaded = self
            .queue
            .get(index)
            .is_some_and(|t| self.loaded_track.as_deref() == Some(t.id.as_str()));
        if !is_loaded {
            return self.play_index(index).await;
        }

        match self.output.play().await {
            Ok(()) => {
                self.is_playing = !self.output.is_paused();
                self.event_tx
                    .send(PlayerEvent::Resume(self.status()))
                    .unwrap_or_default();
                Ok(())
            }
            Err(e) => self.playback_failed(e),
        }
    }

    /// Uniform pick that never repeats the current track unless it's the only one.
    fn random_index(&mut self) -> usize {
        let len = self.queue.len();
        match self.current_index {
            Some(current) if len > 1 => {
                let pick = self.rng.gen_range(0..len - 1);
                if pick >= current { pick + 1 } else { pick }
            }
            _ => self.rng.gen_range(0..len),
        }
    }

    pub(crate) async fn go_next(&mut self) -> Result<(), OutputError> {
        if self.queue.is_empty() {
            info!("Queue is empty. Not going to next track.");
            return Ok(());
        }

        let target = match (self.repeat_mode, self.current_index) {
            (RepeatMode::One, Some(current)) => current,
            _ if self.shuffle_enabled => self.random_index(),
            (_, Some(current)) => (current + 1) % self.queue.len(),
            (_, None) => 0,
        };
        info!(
            "Current position: {:?}, going to next track at {target}",
            self.current_index
        );

        let result = self.skip_to(target).await;
        self.event_tx
            .send(PlayerEvent::Next(self.status()))
            .unwrap_or_default();
        result
    }

    pub(crate) async fn go_previous(&mut self) -> Result<(), OutputError> {
        if self.queue.is_empty() {
            info!("Queue is empty. Not going to previous track.");
            return Ok(());
        }

        if self.current_index.is_some()
            && self.output.current_time() > self.settings.restart_threshold
        {
            info!("Restarting current track");
            self.output.set_current_time(Duration::ZERO);
            self.event_tx
                .send(PlayerEvent::Seek(self.status(), Duration::ZERO))
                .unwrap_or_default();
            return Ok(());
        }

        let target = if self.shuffle_enabled {
            self.random_index()
        } else {
            match self.current_index {
                Some(current) if current > 0 => current - 1,
                _ => self.queue.len() - 1,
            }
        };
        info!(
            "Current position: {:?}, going to previous track at {target}",
            self.current_index
        );

        let result = self.skip_to(target).await;
        self.event_tx
            .send(PlayerEvent::Previous(self.status()))
            .unwrap_or_default();
        result
    }

    pub(crate) async fn on_ended(&mut self) -> Result<(), OutputError> {
        let Some(current) = self.current_index else {
            info!("Received ended event with nothing selected");
            return Ok(());
        };

        info!("Received ended event");
        self.event_tx
            .send(PlayerEvent::Ended(self.status()))
            .unwrap_or_default();

        match self.repeat_mode {
            RepeatMode::One => self.skip_to(current).await,
            RepeatMode::All => self.go_next().await,
            RepeatMode::Off if current + 1 < self.queue.len() => self.go_next().await,
            RepeatMode::Off => {
                info!("Reached end of queue");
                self.is_playing = false;
                self.event_tx
                    .send(PlayerEvent::QueueEnded(self.status()))
                    .unwrap_or_default();
                Ok(())
            }
        }
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        self.shuffle_enabled = !self.shuffle_enabled;
        self.persist();
        self.event_tx
            .send(PlayerEvent::ShuffleChanged(self.status()))
            .unwrap_or_default();
        self.notify(Notification::Shuffle(self.shuffle_enabled));
    }

    pub(crate) fn cycle_repeat(&mut self) {
        self.repeat_mode = self.repeat_mode.cycle();
        self.persist();
        self.event_tx
            .send(PlayerEvent::RepeatChanged(self.status()))
            .unwrap_or_default();
        self.notify(Notification::Repeat(self.repeat_mode));
    }

    pub(crate) fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.is_muted = false;
        self.apply_volume();
        self.persist();
        self.event_tx
            .send(PlayerEvent::SetVolume(self.status()))
            .unwrap_or_default();
    }

    pub(crate) fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
        self.apply_volume();
        self.persist();
        self.event_tx
            .send(PlayerEvent::Mute(self.status()))
            .unwrap_or_default();
    }

    pub(crate) fn seek(&mut self, fraction: f64) {
        let Some(duration) = self.output.duration() else {
            debug!("Duration is not known yet. Ignoring seek.");
            return;
        };

        match Duration::try_from_secs_f64(duration.as_secs_f64() * fraction) {
            Ok(time) => {
                self.output.set_current_time(time);
                self.event_tx
                    .send(PlayerEvent::Seek(self.status(), time))
                    .unwrap_or_default();
            }
            Err(e) => warn!("Ignoring seek to {fraction}: {e}"),
        }
    }
}

#[cfg(test)]
#[path = "./player_test.rs"]
mod player_test;
