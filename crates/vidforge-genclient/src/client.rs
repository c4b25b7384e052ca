//! Sidecar HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{GenerateError, GenerateResult};
use crate::generator::{GeneratedVideo, VideoGenerator};
use crate::types::{GenerationRequest, HealthResponse, LoadModelRequest};

/// Configuration for the sidecar client.
#[derive(Debug, Clone)]
pub struct SidecarConfig {
    /// Base URL of the generation sidecar
    pub base_url: String,
    /// Max retries for transport-level failures
    pub max_retries: u32,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            max_retries: 2,
        }
    }
}

impl SidecarConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SIDECAR_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string()),
            max_retries: std::env::var("SIDECAR_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// HTTP client for the generation sidecar.
///
/// No request timeout is installed: a generation call may legitimately run
/// for many minutes, and the orchestrator has no cancellation contract.
pub struct SidecarClient {
    http: Client,
    config: SidecarConfig,
}

impl SidecarClient {
    /// Create a new sidecar client.
    pub fn new(config: SidecarConfig) -> GenerateResult<Self> {
        let http = Client::builder().build().map_err(GenerateError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenerateResult<Self> {
        Self::new(SidecarConfig::from_env())
    }

    /// Check if the sidecar is up and has its model loaded.
    pub async fn healthy(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthResponse>().await {
                    Ok(health) => health.status == "healthy" || health.status == "ok",
                    Err(e) => {
                        warn!("Sidecar health response malformed: {}", e);
                        false
                    }
                }
            }
            Ok(response) => {
                warn!("Sidecar health check failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Sidecar health check error: {}", e);
                false
            }
        }
    }

    /// Ask the sidecar to load its model on the given device.
    ///
    /// Called once at worker startup, before any generation; loading takes
    /// minutes and a failure here means the worker has no usable device.
    pub async fn load_model(&self, device: &str) -> GenerateResult<()> {
        let url = format!("{}/load", self.config.base_url);
        let request = LoadModelRequest {
            device: device.to_string(),
        };

        debug!(device = device, "Requesting model load from {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(GenerateError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::ServiceUnavailable(format!(
                "model load returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Execute with retry logic for transport-level failures only.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> GenerateResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = GenerateResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Sidecar request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GenerateError::ServiceUnavailable("retries exhausted".to_string())
        }))
    }
}

#[async_trait]
impl VideoGenerator for SidecarClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<GeneratedVideo> {
        let url = format!("{}/generate", self.config.base_url);

        debug!(seed = request.seed, "Sending generation request to {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(request)
                    .send()
                    .await
                    .map_err(GenerateError::Network)
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::GenerationFailed(format!(
                "sidecar returned {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await.map_err(GenerateError::Network)?;
        if bytes.is_empty() {
            return Err(GenerateError::InvalidResponse(
                "sidecar returned an empty artifact".to_string(),
            ));
        }

        Ok(GeneratedVideo {
            bytes: bytes.to_vec(),
        })
    }
}
