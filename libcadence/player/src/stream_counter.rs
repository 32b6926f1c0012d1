use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

#[derive(Error, Debug)]
pub enum StreamCountError {
    #[error("Stream count request failed: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("Error reading stream count response: {0}")]
    Response(#[from] reqwest::Error),
    #[error("Invalid stream count response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Stream count rejected: {0}")]
    Rejected(String),
}

/// Records that a track started playing. Callers treat this as telemetry and never wait on it.
#[async_trait]
pub trait StreamCounter: Send + Sync {
    async fn increment(&self, track_id: &str) -> Result<(), StreamCountError>;
}

#[derive(Deserialize)]
struct StreamResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct HttpStreamCounter {
    endpoint: String,
    client: ClientWithMiddleware,
}

impl HttpStreamCounter {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(2);
        let client = ClientBuilder::new(CLIENT.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
            client,
        }
    }

    fn url(&self, track_id: &str) -> String {
        format!("{}/stream/{track_id}", self.endpoint)
    }
}

#[async_trait]
impl StreamCounter for HttpStreamCounter {
    async fn increment(&self, track_id: &str) -> Result<(), StreamCountError> {
        let url = self.url(track_id);
        info!("Incrementing stream count: {url}");
        let body = self.client.post(url).send().await?.bytes().await?;
        let response: StreamResponse = serde_json::from_slice(&body)?;
        if response.success {
            Ok(())
        } else {
            Err(StreamCountError::Rejected(
                response.error.unwrap_or_else(|| "unknown error".to_owned()),
            ))
        }
    }
}

#[cfg(test)]
#[path = "./stream_counter_test.rs"]
mod stream_counter_test;
