use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    #[error("Playback was not allowed by the host: {0}")]
    NotAllowed(String),
    #[error("Failed to load audio source: {0}")]
    Network(String),
    #[error("Audio source is not supported: {0}")]
    Unsupported(String),
    #[error("No audio source has been set")]
    NoSource,
}

/// The media resource the player drives.
///
/// Volume is in the output's native `0.0..=1.0` range. Setting a new source resets the
/// playback position to zero.
#[async_trait]
pub trait AudioOutput: Send {
    fn set_source(&mut self, url: &str);

    /// Starts or resumes playback of the current source. Resolves once the output has either
    /// started producing sound or rejected the request.
    async fn play(&mut self) -> Result<(), OutputError>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    fn current_time(&self) -> Duration;

    fn set_current_time(&mut self, time: Duration);

    /// Total length of the source, available once its metadata has loaded.
    fn duration(&self) -> Option<Duration>;

    fn set_volume(&mut self, volume: f32);
}
