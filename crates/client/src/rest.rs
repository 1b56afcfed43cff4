//! REST client for the generation endpoints.
//!
//! This is the polling/command side of the client: starting a run, asking
//! for its status, fetching the final result, and cancelling. Request
//! failures here are surfaced to the caller (unlike the live-update channel,
//! which retries silently).

use serde::de::DeserializeOwned;
use serde::Deserialize;

use pw_protocol::{GenerationRequest, GenerationResponse, GenerationResult, GenerationStatus};

use crate::config::ServerConfig;
use crate::error::{ClientError, ClientResult};

/// Error body shape used by the backend for non-success responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    detail: String,
}

/// Client for the generation REST API.
#[derive(Debug, Clone)]
pub struct GenerationApi {
    http: reqwest::Client,
    config: ServerConfig,
}

impl GenerationApi {
    /// Create a client against the given server.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The endpoint configuration this client talks to.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Start a generation run for an episode.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the request cannot be sent and
    /// `ClientError::Api` if the backend rejects it. No retry is attempted;
    /// the caller owns the failure.
    pub async fn start(&self, request: &GenerationRequest) -> ClientResult<GenerationResponse> {
        let url = self.config.api_url("/generate");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;
        read_json(url, response).await
    }

    /// Fetch the current status of a task (the 5-second poll fallback).
    pub async fn status(&self, task_id: &str) -> ClientResult<GenerationStatus> {
        self.get(format!("/generate/{task_id}/status")).await
    }

    /// Fetch the final result of a completed task.
    pub async fn result(&self, task_id: &str) -> ClientResult<GenerationResult> {
        self.get(format!("/generate/{task_id}/result")).await
    }

    /// Request cancellation of a running task.
    ///
    /// Cancellation is idempotent from the client's perspective: any
    /// success response is treated as terminal, and repeating the call is
    /// harmless.
    pub async fn cancel(&self, task_id: &str) -> ClientResult<GenerationResponse> {
        let url = self.config.api_url(&format!("/generate/{task_id}/cancel"));
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;
        read_json(url, response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: String) -> ClientResult<T> {
        let url = self.config.api_url(&path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;
        read_json(url, response).await
    }
}

/// Decode a success body, or map an error response to `ClientError::Api`
/// carrying the backend's `detail` string when it provides one.
async fn read_json<T: DeserializeOwned>(url: String, response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|source| ClientError::Decode { url, source });
    }

    let detail = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.detail,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        url,
        detail,
    })
}
