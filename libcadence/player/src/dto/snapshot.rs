use serde::{Deserialize, Serialize};

use super::repeat_mode::RepeatMode;
use super::track::Track;

/// Durable subset of the player state. Transport fields are left out since a reloaded
/// session cannot resume audio from a destroyed source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub(crate) current_track: Option<Track>,
    #[serde(default)]
    pub(crate) queue: Vec<Track>,
    pub(crate) volume: u8,
    #[serde(default)]
    pub(crate) is_muted: bool,
    #[serde(default)]
    pub(crate) shuffle_enabled: bool,
    #[serde(default)]
    pub(crate) repeat_mode: RepeatMode,
    #[serde(default)]
    pub(crate) current_index: Option<usize>,
}

impl Snapshot {
    /// Index of the track that should be selected after a restore, if it still points into the
    /// queue.
    pub(crate) fn selected_index(&self) -> Option<usize> {
        match self.current_index {
            Some(index) if index < self.queue.len() => Some(index),
            Some(_) => None,
            None => self
                .current_track
                .as_ref()
                .and_then(|current| self.queue.iter().position(|t| t.id == current.id)),
        }
    }
}
