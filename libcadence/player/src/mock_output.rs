use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::audio_output::{AudioOutput, OutputError};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputCall {
    SetSource(String),
    Play,
    Pause,
    SetCurrentTime(Duration),
    SetVolume(f32),
}

#[derive(Debug)]
struct MockState {
    source: Option<String>,
    paused: bool,
    position: Duration,
    duration: Option<Duration>,
    volume: f32,
    play_results: VecDeque<OutputError>,
    calls: Vec<OutputCall>,
}

/// In-memory [`AudioOutput`] for tests and headless hosts.
///
/// Clones share state, so a clone kept by the caller can inspect calls and drive the
/// position after the original has been handed to the player.
#[derive(Clone, Debug)]
pub struct MockOutput {
    state: Arc<Mutex<MockState>>,
    default_duration: Option<Duration>,
}

impl Default for MockOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOutput {
    pub fn new() -> Self {
        Self::with_duration(Some(Duration::from_secs(180)))
    }

    pub fn with_duration(duration: Option<Duration>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                source: None,
                paused: true,
                position: Duration::ZERO,
                duration: None,
                volume: 1.0,
                play_results: VecDeque::new(),
                calls: vec![],
            })),
            default_duration: duration,
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next call to `play` fail with `error`. Failures queue up in order.
    pub fn fail_next_play(&self, error: OutputError) {
        self.lock().play_results.push_back(error);
    }

    /// Simulates playback progress.
    pub fn advance_to(&self, position: Duration) {
        self.lock().position = position;
    }

    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    pub fn position(&self) -> Duration {
        self.lock().position
    }

    pub fn volume(&self) -> f32 {
        self.lock().volume
    }

    pub fn paused(&self) -> bool {
        self.lock().paused
    }

    pub fn calls(&self) -> Vec<OutputCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl AudioOutput for MockOutput {
    fn set_source(&mut self, url: &str) {
        let default_duration = self.default_duration;
        let mut state = self.lock();
        state.calls.push(OutputCall::SetSource(url.to_owned()));
        state.source = Some(url.to_owned());
        state.position = Duration::ZERO;
        state.duration = default_duration;
        state.paused = true;
    }

    async fn play(&mut self) -> Result<(), OutputError> {
        let mut state = self.lock();
        state.calls.push(OutputCall::Play);
        if state.source.is_none() {
            return Err(OutputError::NoSource);
        }
        if let Some(err) = state.play_results.pop_front() {
            info!("Mock output rejecting play: {err}");
            return Err(err);
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.lock();
        state.calls.push(OutputCall::Pause);
        state.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn current_time(&self) -> Duration {
        self.lock().position
    }

    fn set_current_time(&mut self, time: Duration) {
        let mut state = self.lock();
        state.calls.push(OutputCall::SetCurrentTime(time));
        state.position = time;
    }

    fn duration(&self) -> Option<Duration> {
        self.lock().duration
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = self.lock();
        state.calls.push(OutputCall::SetVolume(volume));
        state.volume = volume;
    }
}
