use std::time::Duration;

use strum::Display;

use super::notification::Notification;
use super::player_state::PlayerState;
use crate::audio_output::OutputError;

#[derive(Clone, Debug, Display)]
pub enum PlayerEvent {
    Restored(PlayerState),
    Play(PlayerState),
    PlayFailed(PlayerState, OutputError),
    Pause(PlayerState),
    Resume(PlayerState),
    QueueUpdated(PlayerState),
    Next(PlayerState),
    Previous(PlayerState),
    Seek(PlayerState, Duration),
    SetVolume(PlayerState),
    Mute(PlayerState),
    ShuffleChanged(PlayerState),
    RepeatChanged(PlayerState),
    Ended(PlayerState),
    QueueEnded(PlayerState),
    Notify(Notification),
}
