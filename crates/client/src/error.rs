//! Error types for the pipewatch client.
//!
//! This module defines all errors that can surface from REST calls and URL
//! handling. Transport-level channel failures are deliberately absent: the
//! live-update channel degrades to "disconnected, will retry" instead of
//! returning errors (see the `channel` module).

use thiserror::Error;

/// Errors that can occur while talking to the generation backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP request itself failed (connection refused, timeout, ...).
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {url}: {detail}")]
    Api {
        status: u16,
        url: String,
        detail: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: reqwest::Error,
    },

    /// The configured server URL is not a valid URL.
    #[error("Invalid server URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The server URL uses a scheme with no WebSocket counterpart.
    #[error("Cannot derive a live-update URL from scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

/// Type alias for Result with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
