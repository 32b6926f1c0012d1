use tracing::{error, info};

use crate::dto::command::Command;
use crate::dto::player_response::PlayerResponse;
use crate::player::Player;
use crate::two_way_channel::TwoWayReceiver;

/// Runs every command against the player in arrival order, each to completion.
pub(crate) async fn main_loop(
    mut receiver: TwoWayReceiver<Command, PlayerResponse>,
    mut player: Player,
) {
    player.restore();

    while let Some(next_command) = receiver.recv_async().await {
        info!("Got command {:?}", next_command);
        // Playback failures are already logged and broadcast by the player
        match next_command {
            Command::Play(track) => {
                player.play(track).await.ok();
            }
            Command::AddToQueue(track) => {
                player.add_to_queue(track);
            }
            Command::PlayFromQueue(index) => {
                player.play_from_queue(index).await.ok();
            }
            Command::RemoveFromQueue(index) => {
                player.remove_from_queue(index);
            }
            Command::ClearQueue => {
                player.clear_queue();
            }
            Command::TogglePlayPause => {
                player.toggle_play_pause().await.ok();
            }
            Command::Next => {
                player.go_next().await.ok();
            }
            Command::Previous => {
                player.go_previous().await.ok();
            }
            Command::Ended => {
                player.on_ended().await.ok();
            }
            Command::ToggleShuffle => {
                player.toggle_shuffle();
            }
            Command::CycleRepeat => {
                player.cycle_repeat();
            }
            Command::SetVolume(volume) => {
                player.set_volume(volume);
            }
            Command::ToggleMute => {
                player.toggle_mute();
            }
            Command::Seek(fraction) => {
                player.seek(fraction);
            }
            Command::GetCurrentStatus => {
                let current_status = player.status();
                if let Err(e) = receiver.respond(PlayerResponse::StatusResponse(current_status)) {
                    error!("Error sending player status: {e:?}");
                }
            }
            Command::Persist => {
                player.persist();
            }
            Command::Shutdown => {
                player.persist();
                info!("Shutting down player loop");
                return;
            }
        }
        info!("Completed command");
    }
    // Every handle was dropped without calling join
    player.persist();
    info!("Request loop completed");
}
