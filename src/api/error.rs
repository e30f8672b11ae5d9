//! Error types for the API client.

use thiserror::Error;

/// Errors that can occur when calling the DH-lab API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The base URL or endpoint does not form a valid URL.
    #[error("invalid API URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, interrupted body).
    #[error("transport error calling {url}: {source}")]
    Transport {
        /// The endpoint URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("DH-lab API returned HTTP {status} for {url}")]
    Remote {
        /// The endpoint URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Leading part of the response body, for diagnostics.
        body: String,
    },

    /// The response body is not JSON of the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The endpoint URL.
        url: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates a remote status error.
    pub fn remote(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Remote {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
