//! Landmark service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use pcoach_media::{encode_base64_jpeg, Frame, LandmarkDetector, MediaResult};
use pcoach_models::LandmarkSet;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::{MlError, MlResult};
use crate::types::{HealthResponse, LandmarkRequest, LandmarkResponse};

/// JPEG quality for frames sent to the detector.
const DETECTION_JPEG_QUALITY: u8 = 90;

/// Configuration for the landmark client.
#[derive(Debug, Clone)]
pub struct LandmarkClientConfig {
    /// Base URL of the landmark service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LandmarkClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LandmarkClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LANDMARK_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("LANDMARK_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Client for the landmark detection service.
pub struct LandmarkClient {
    http: Client,
    config: LandmarkClientConfig,
}

impl LandmarkClient {
    /// Create a new landmark client.
    pub fn new(config: LandmarkClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(LandmarkClientConfig::from_env())
    }

    /// Check if the landmark service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Landmark service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Landmark service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Run detection on one encoded frame.
    pub async fn detect_landmarks(&self, request: &LandmarkRequest) -> MlResult<LandmarkResponse> {
        let url = format!("{}/landmarks", self.config.base_url);

        debug!(
            "Sending {}x{} frame to landmark service at {}",
            request.width, request.height, url
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(MlError::ServiceUnavailable(url));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MlError::RequestFailed(format!(
                "Landmark service returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| MlError::InvalidResponse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> MlError {
        if err.is_timeout() {
            MlError::Timeout(self.config.timeout.as_secs())
        } else if err.is_connect() {
            MlError::ServiceUnavailable(err.to_string())
        } else {
            MlError::Network(err)
        }
    }
}

#[async_trait]
impl LandmarkDetector for LandmarkClient {
    async fn detect(&self, frame: &Frame) -> MediaResult<LandmarkSet> {
        let image_base64 = encode_base64_jpeg(frame, DETECTION_JPEG_QUALITY)?;
        let request = LandmarkRequest {
            image_base64,
            width: frame.width(),
            height: frame.height(),
        };

        let response = self.detect_landmarks(&request).await?;
        Ok(response.landmarks)
    }

    fn name(&self) -> &'static str {
        "landmark-service"
    }
}
