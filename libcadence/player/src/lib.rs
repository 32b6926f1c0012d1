mod audio_output;
mod dto;
mod event_loop;
mod keyboard;
mod mock_output;
mod player;
mod settings;
mod storage;
mod stream_counter;
mod two_way_channel;
mod util;
pub use mock_output::{MockOutput, OutputCall};

pub mod cadence_player {
    use std::sync::Arc;

    use thiserror::Error;
    use tokio::sync::broadcast;
    use tokio::task::JoinHandle;
    use tracing::{info, warn};

    pub use crate::audio_output::{AudioOutput, OutputError};
    use crate::dto::command::Command;
    pub use crate::dto::notification::Notification;
    pub use crate::dto::player_event::PlayerEvent;
    use crate::dto::player_response::PlayerResponse;
    pub use crate::dto::player_state::PlayerState;
    pub use crate::dto::repeat_mode::RepeatMode;
    pub use crate::dto::track::{Track, TrackError};
    use crate::event_loop::main_loop;
    pub use crate::keyboard::{Focus, PlayerAction, shortcut_for};
    use crate::player::Player;
    pub use crate::settings::Settings;
    pub use crate::storage::{FileStorage, MemoryStorage, StateStorage, StorageError};
    pub use crate::stream_counter::{HttpStreamCounter, StreamCountError, StreamCounter};
    use crate::two_way_channel::{TwoWaySender, two_way_channel};
    pub use crate::util::{format_time, seek_fraction};

    #[derive(Debug, Clone, Error)]
    #[error("{0}")]
    pub struct PlayerError(String);

    /// Handle to a playback queue controller running on its own task.
    ///
    /// Commands are processed one at a time in the order they are sent. State changes are
    /// published through [`CadencePlayer::subscribe`].
    #[derive(Debug)]
    pub struct CadencePlayer {
        cmd_sender: TwoWaySender<Command, PlayerResponse>,
        event_tx: broadcast::Sender<PlayerEvent>,
        loop_handle: Option<JoinHandle<()>>,
    }

    impl CadencePlayer {
        /// Starts the controller and restores the previous session's state from `storage`.
        ///
        /// Must be called from within a tokio runtime.
        pub fn new(
            output: impl AudioOutput + 'static,
            storage: Box<dyn StateStorage + Send + Sync>,
            stream_counter: Arc<dyn StreamCounter>,
            settings: Settings,
        ) -> Self {
            let (event_tx, _) = broadcast::channel(settings.event_capacity.max(1));
            let (cmd_tx, cmd_rx) = two_way_channel();

            let player = Player::new(
                Box::new(output),
                storage,
                stream_counter,
                event_tx.clone(),
                settings,
            );
            let loop_handle = tokio::spawn(main_loop(cmd_rx, player));

            Self {
                cmd_sender: cmd_tx,
                event_tx,
                loop_handle: Some(loop_handle),
            }
        }

        /// Uses file storage in the platform data directory and reports streams over HTTP.
        pub fn with_defaults(
            output: impl AudioOutput + 'static,
            settings: Settings,
        ) -> Result<Self, PlayerError> {
            let storage = FileStorage::try_new().map_err(|e| PlayerError(format!("{e:?}")))?;
            let stream_counter = Arc::new(HttpStreamCounter::new(settings.stream_endpoint.clone()));
            Ok(Self::new(output, storage, stream_counter, settings))
        }

        pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
            self.event_tx.subscribe()
        }

        async fn send(&self, command: Command) -> Result<(), PlayerError> {
            self.cmd_sender
                .send_async(command)
                .await
                .map_err(|e| PlayerError(format!("{e:?}")))
        }

        pub async fn play(&self, track: Track) -> Result<(), PlayerError> {
            self.send(Command::Play(track)).await
        }

        pub async fn add_to_queue(&self, track: Track) -> Result<(), PlayerError> {
            self.send(Command::AddToQueue(track)).await
        }

        pub async fn play_from_queue(&self, index: usize) -> Result<(), PlayerError> {
            self.send(Command::PlayFromQueue(index)).await
        }

        pub async fn remove_from_queue(&self, index: usize) -> Result<(), PlayerError> {
            self.send(Command::RemoveFromQueue(index)).await
        }

        /// Callers are expected to have confirmed this with the user.
        pub async fn clear_queue(&self) -> Result<(), PlayerError> {
            self.send(Command::ClearQueue).await
        }

        pub async fn toggle_play_pause(&self) -> Result<(), PlayerError> {
            self.send(Command::TogglePlayPause).await
        }

        pub async fn next(&self) -> Result<(), PlayerError> {
            self.send(Command::Next).await
        }

        pub async fn previous(&self) -> Result<(), PlayerError> {
            self.send(Command::Previous).await
        }

        /// Called from the audio output's end-of-playback callback.
        pub fn track_ended(&self) -> Result<(), PlayerError> {
            self.cmd_sender
                .send(Command::Ended)
                .map_err(|e| PlayerError(format!("{e:?}")))
        }

        pub async fn toggle_shuffle(&self) -> Result<(), PlayerError> {
            self.send(Command::ToggleShuffle).await
        }

        pub async fn cycle_repeat(&self) -> Result<(), PlayerError> {
            self.send(Command::CycleRepeat).await
        }

        /// Values above 100 are clamped.
        pub async fn set_volume(&self, volume: u8) -> Result<(), PlayerError> {
            self.send(Command::SetVolume(volume)).await
        }

        pub async fn toggle_mute(&self) -> Result<(), PlayerError> {
            self.send(Command::ToggleMute).await
        }

        /// Seeks to `fraction` of the current track's duration. The caller is responsible for
        /// keeping it within `0.0..=1.0`.
        pub async fn seek(&self, fraction: f64) -> Result<(), PlayerError> {
            self.send(Command::Seek(fraction)).await
        }

        /// Writes the current state to storage. Hook this to page unload.
        pub async fn persist(&self) -> Result<(), PlayerError> {
            self.send(Command::Persist).await
        }

        pub async fn dispatch(&self, action: PlayerAction) -> Result<(), PlayerError> {
            info!("Dispatching {action}");
            match action {
                PlayerAction::TogglePlayPause => self.toggle_play_pause().await,
                PlayerAction::Next => self.next().await,
                PlayerAction::Previous => self.previous().await,
            }
        }

        pub async fn get_current_status(&self) -> Result<PlayerState, PlayerError> {
            match self
                .cmd_sender
                .get_response(Command::GetCurrentStatus)
                .await
            {
                Ok(PlayerResponse::StatusResponse(state)) => Ok(state),
                Err(e) => Err(PlayerError(format!("{e:?}"))),
            }
        }

        /// Persists the state and waits for the controller task to finish.
        pub async fn join(mut self) -> Result<(), PlayerError> {
            info!("Joining player instance");
            self.send(Command::Shutdown).await?;
            if let Some(handle) = self.loop_handle.take() {
                handle.await.map_err(|e| {
                    warn!("Player loop terminated abnormally: {e:?}");
                    PlayerError(format!("{e:?}"))
                })?;
            }
            info!("Player loop terminated");
            Ok(())
        }
    }
}
