use std::time::Duration;

use super::repeat_mode::RepeatMode;
use super::track::Track;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub queue: Vec<Track>,
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: Duration,
    pub duration: Option<Duration>,
    pub volume: u8,
    pub is_muted: bool,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
}

impl PlayerState {
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    pub fn effective_volume(&self) -> u8 {
        if self.is_muted { 0 } else { self.volume }
    }
}
