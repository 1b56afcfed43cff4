//! Server endpoint configuration.
//!
//! The backend exposes everything under `/api/v1`: REST routes for starting
//! and inspecting generation tasks, and a per-task WebSocket endpoint for
//! live updates. This module derives both URL families from a single HTTP
//! base URL, switching to the matching WebSocket scheme (http -> ws,
//! https -> wss) for the live-update endpoint.

use url::Url;

use crate::error::{ClientError, ClientResult};

/// API path prefix shared by REST and WebSocket endpoints.
const API_PREFIX: &str = "/api/v1";

/// Location of the generation backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    base_url: Url,
}

impl ServerConfig {
    /// Parse a base URL such as `http://localhost:8000`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let url = Url::parse(base_url).map_err(|source| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self { base_url: url }),
            other => Err(ClientError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    /// The configured HTTP base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a REST endpoint URL under `/api/v1`.
    ///
    /// `path` must start with `/`, e.g. `/generate/t1/status`.
    pub fn api_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{API_PREFIX}{path}")
    }

    /// Build the live-update WebSocket URL for a task.
    ///
    /// Uses the secure scheme exactly when the base URL is secure.
    pub fn ws_task_url(&self, task_id: &str) -> ClientResult<Url> {
        let scheme = match self.base_url.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(ClientError::UnsupportedScheme {
                    scheme: other.to_string(),
                })
            }
        };

        let authority = match (self.base_url.host_str(), self.base_url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ClientError::UnsupportedScheme {
                    scheme: self.base_url.scheme().to_string(),
                })
            }
        };

        let raw = format!("{scheme}://{authority}{API_PREFIX}/ws/task/{task_id}");
        Url::parse(&raw).map_err(|source| ClientError::InvalidUrl { url: raw, source })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Development default of the generation backend.
            base_url: Url::parse("http://localhost:8000").expect("default URL is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_prefix() {
        let config = ServerConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.api_url("/generate/t1/status"),
            "http://localhost:8000/api/v1/generate/t1/status"
        );
    }

    #[test]
    fn test_ws_url_from_http() {
        let config = ServerConfig::new("http://localhost:8000").unwrap();
        let url = config.ws_task_url("t1").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8000/api/v1/ws/task/t1");
    }

    #[test]
    fn test_ws_url_from_https_is_secure() {
        let config = ServerConfig::new("https://studio.example").unwrap();
        let url = config.ws_task_url("abc").unwrap();
        assert_eq!(url.as_str(), "wss://studio.example/api/v1/ws/task/abc");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = ServerConfig::new("ftp://host");
        assert!(matches!(
            result,
            Err(ClientError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn test_rejects_garbage_url() {
        assert!(matches!(
            ServerConfig::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
