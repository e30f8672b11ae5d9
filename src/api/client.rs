//! HTTP client for the DH-lab JSON API.
//!
//! Every call is a single POST with a JSON body. The status code is checked
//! before the body is decoded, so a service error is never mistaken for a
//! malformed response. Nothing is retried.

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::records::{ConcordanceRecord, CorpusRecord};
use crate::query::{ConcordanceQuery, CorpusQuery};
use crate::user_agent;

/// Base URL of the public DH-lab API.
pub const DHLAB_API_URL: &str = "https://api.nb.no/dhlab/";

/// Endpoint of corpus selection requests.
pub const CORPUS_ENDPOINT: &str = "build_corpus";

/// Endpoint of concordance requests.
pub const CONCORDANCE_ENDPOINT: &str = "conc";

/// Maximum number of body characters kept on a remote error.
const ERROR_BODY_CHARS: usize = 200;

/// Client for the DH-lab API.
///
/// Create once and reuse; the underlying connection pool is shared by clones.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for the public DH-lab API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DHLAB_API_URL)
    }

    /// Creates a client against a custom base URL (alternate mirrors, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse as an
    /// absolute URL, and [`ApiError::Transport`] if the HTTP client cannot be
    /// built.
    #[instrument(level = "debug", skip_all, fields(base_url = %base_url))]
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        let mut parsed = Url::parse(base_url).map_err(|_| ApiError::invalid_url(base_url))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::invalid_url(base_url));
        }
        // Url::join replaces the last segment unless the path ends in '/'.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| ApiError::transport(base_url, source))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// The base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the result is not a valid URL.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|_| ApiError::invalid_url(format!("{}{endpoint}", self.base_url)))
    }

    /// POSTs `payload` as JSON to `endpoint` and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] on connection failure or an interrupted body
    /// - [`ApiError::Remote`] if the status is outside 2xx
    /// - [`ApiError::Decode`] if the body is not JSON of type `Resp`
    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn execute<Req, Resp>(&self, endpoint: &str, payload: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint)?;
        debug!(url = %url, "Calling DH-lab API");

        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|source| ApiError::transport(url.as_str(), source))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::transport(url.as_str(), source))?;

        if !status.is_success() {
            let snippet: String = String::from_utf8_lossy(&body)
                .chars()
                .take(ERROR_BODY_CHARS)
                .collect();
            warn!(status = status.as_u16(), body = %snippet, "DH-lab API returned an error status");
            return Err(ApiError::remote(url.as_str(), status.as_u16(), snippet));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "DH-lab API responded");
        serde_json::from_slice(&body).map_err(|source| ApiError::decode(url.as_str(), source))
    }

    /// Runs a corpus selection request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn fetch_corpus(&self, query: &CorpusQuery) -> Result<CorpusRecord, ApiError> {
        self.execute(CORPUS_ENDPOINT, query).await
    }

    /// Runs a concordance request.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn fetch_concordance(
        &self,
        query: &ConcordanceQuery,
    ) -> Result<ConcordanceRecord, ApiError> {
        self.execute(CONCORDANCE_ENDPOINT, query).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_endpoints() {
        let client = ApiClient::new().unwrap();
        assert_eq!(
            client.endpoint_url(CORPUS_ENDPOINT).unwrap().as_str(),
            "https://api.nb.no/dhlab/build_corpus"
        );
        assert_eq!(
            client.endpoint_url(CONCORDANCE_ENDPOINT).unwrap().as_str(),
            "https://api.nb.no/dhlab/conc"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash_keeps_last_segment() {
        let client = ApiClient::with_base_url("https://mirror.example.org/dhlab").unwrap();
        assert_eq!(
            client.endpoint_url("/conc").unwrap().as_str(),
            "https://mirror.example.org/dhlab/conc"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ApiClient::with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));

        let err = ApiClient::with_base_url("mailto:someone@example.org").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }
}
