use std::fmt::Debug;

use super::track::Track;

#[derive(Clone, Debug)]
pub(crate) enum Command {
    Play(Track),
    AddToQueue(Track),
    PlayFromQueue(usize),
    RemoveFromQueue(usize),
    ClearQueue,
    TogglePlayPause,
    Next,
    Previous,
    Ended,
    ToggleShuffle,
    CycleRepeat,
    SetVolume(u8),
    ToggleMute,
    Seek(f64),
    GetCurrentStatus,
    Persist,
    Shutdown,
}
