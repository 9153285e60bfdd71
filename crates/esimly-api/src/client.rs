// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL construction, bearer-token
// injection, and error normalization. All endpoint modules (auth,
// retailer, admin) are implemented as inherent methods via separate
// files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::envelope;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the storefront backend.
///
/// Owns the single base URL (no per-call-site environment switching) and
/// the bearer token used on protected endpoints. The token slot is
/// re-read on every request, so a login or logout mid-session is picked
/// up by the next call without rebuilding the client.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `https://api.esimly.io`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Install the bearer token used for protected endpoints.
    pub fn set_token(&self, token: SecretString) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path (no leading slash).
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    /// Apply the stored bearer token to a request builder.
    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request, returning the normalized JSON body.
    pub(crate) async fn get(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {}", url);
        let resp = self
            .apply_auth(self.http.get(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        debug!("POST {}", url);
        let resp = self
            .apply_auth(self.http.post(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with no body.
    pub(crate) async fn post_empty(&self, url: Url) -> Result<Value, Error> {
        debug!("POST {}", url);
        let resp = self
            .apply_auth(self.http.post(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a PUT request with a JSON body.
    pub(crate) async fn put(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Value, Error> {
        debug!("PUT {}", url);
        let resp = self
            .apply_auth(self.http.put(url).json(body))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete(&self, url: Url) -> Result<Value, Error> {
        debug!("DELETE {}", url);
        let resp = self
            .apply_auth(self.http.delete(url))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a multipart POST (bulk CSV uploads).
    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<Value, Error> {
        debug!("POST (multipart) {}", url);
        let resp = self
            .apply_auth(self.http.post(url).multipart(form))
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Typed GET: fetch and extract a list payload.
    pub(crate) async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        keys: &[&str],
    ) -> Result<Vec<T>, Error> {
        let value = self.get(url).await?;
        envelope::extract_list(value, keys)
    }

    /// Typed GET: fetch and extract a single-object payload.
    pub(crate) async fn get_object<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        keys: &[&str],
    ) -> Result<T, Error> {
        let value = self.get(url).await?;
        envelope::extract_object(value, keys)
    }

    /// Normalize the response: non-2xx becomes `Error::Api` carrying the
    /// body's `message`/`error` field (or a generic fallback), 401 becomes
    /// `Error::Authentication`. An empty 2xx body parses as `null`.
    async fn parse_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        let value: Value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: envelope::extract_message(&value)
                    .unwrap_or_else(|| "session expired or invalid token".into()),
            });
        }

        if !status.is_success() {
            let message = envelope::extract_message(&value)
                .unwrap_or_else(|| format!("request failed with HTTP {status}"));
            return Err(Error::Api {
                message,
                status: status.as_u16(),
            });
        }

        Ok(value)
    }
}
