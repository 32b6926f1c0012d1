use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

#[derive(Clone, Debug)]
pub struct Settings {
    /// Base URL of the service exposing `POST /stream/{id}`.
    pub stream_endpoint: String,
    /// Key the player snapshot is stored under.
    pub storage_key: String,
    pub default_volume: u8,
    /// `previous` restarts the current track instead of moving back once playback is past this
    /// point.
    pub restart_threshold: Duration,
    pub event_capacity: usize,
    /// Fixed seed for shuffle selection. Random when unset.
    pub shuffle_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stream_endpoint: "http://localhost:5000".to_owned(),
            storage_key: "cadence-player-state".to_owned(),
            default_volume: 100,
            restart_threshold: Duration::from_secs(3),
            event_capacity: 32,
            shuffle_seed: None,
        }
    }
}

impl Settings {
    /// Reads overrides from the environment, loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            stream_endpoint: lookup("CADENCE_STREAM_ENDPOINT").unwrap_or(defaults.stream_endpoint),
            storage_key: lookup("CADENCE_STORAGE_KEY").unwrap_or(defaults.storage_key),
            default_volume: parse_var(&lookup, "CADENCE_DEFAULT_VOLUME")
                .map(|v: u8| v.min(100))
                .unwrap_or(defaults.default_volume),
            restart_threshold: parse_var(&lookup, "CADENCE_RESTART_THRESHOLD_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.restart_threshold),
            event_capacity: defaults.event_capacity,
            shuffle_seed: parse_var(&lookup, "CADENCE_SHUFFLE_SEED"),
        }
    }
}

fn parse_var<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let value = lookup(name)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid value {value:?} for {name}");
            None
        }
    }
}

#[cfg(test)]
#[path = "./settings_test.rs"]
mod settings_test;
