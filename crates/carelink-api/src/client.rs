//! Client construction and the authenticated request path.
//!
//! Every authenticated call attaches the stored access token and recovers
//! from exactly one class of failure — access-token expiry — by refreshing
//! and resending the request once. All other failures surface to the caller
//! untouched.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::credentials::{CredentialStore, TokenPair};
use crate::error::ApiError;
use crate::types::TokenRefreshResponse;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the carelink coordination API.
///
/// Holds the HTTP client, the normalised base URL, and the injected
/// credential store. Cheap to share behind an `Arc`; each call is an
/// independent unit of work and many may be in flight concurrently.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    /// Serialises token refreshes so concurrent 401s trigger one refresh
    /// call instead of one per request.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Creates a new client against `base_url` with the given total request
    /// timeout and credential store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so
        // Url::join appends to the API root instead of replacing its last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            input: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            store,
            refresh_gate: Mutex::new(()),
        })
    }

    /// The credential store backing this client.
    #[must_use]
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Performs an authenticated JSON call and deserializes the response.
    ///
    /// Attaches `Authorization: Bearer <access>` when a pair is stored. On
    /// a 401 the client refreshes the pair and resends the request exactly
    /// once; a second 401, a missing refresh token, or a failed refresh
    /// call all end the session.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] — no usable credentials after at
    ///   most one refresh attempt.
    /// - [`ApiError::RequestFailed`] — any other non-2xx status, verbatim.
    /// - [`ApiError::Timeout`] — no response within the bound.
    /// - [`ApiError::Http`] — connection-level failure.
    /// - [`ApiError::Deserialize`] — response shape mismatch.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send_with_auth(method, path, body).await?;
        let response = Self::check_status(response).await?;
        Self::read_json(path, response).await
    }

    /// Performs an unauthenticated JSON call (registration and the token
    /// endpoints). No bearer header is attached and a 401 is terminal —
    /// refreshing in response to a failed login would loop.
    pub(crate) async fn request_public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send_once(method, path, body, None).await?;
        let response = Self::check_status(response).await?;
        Self::read_json(path, response).await
    }

    /// Sends the request, attaching the current access token, and runs the
    /// one-shot refresh-and-retry cycle on a 401.
    async fn send_with_auth(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let access = self.store.load().map(|pair| pair.access);
        let first = self
            .send_once(method.clone(), path, body, access.as_deref())
            .await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let fresh = self.refresh_access_token(access.as_deref()).await?;
        tracing::debug!(path, "retrying request with refreshed access token");
        let second = self.send_once(method, path, body, Some(&fresh)).await?;
        if second.status() == StatusCode::UNAUTHORIZED {
            // Already retried once; a second rejection ends the session.
            return Err(ApiError::Unauthenticated);
        }
        Ok(second)
    }

    /// Exchanges the stored refresh token for a new pair and persists it
    /// atomically, returning the new access token.
    ///
    /// `stale_access` is the token the caller just saw rejected. Refreshes
    /// are serialised behind `refresh_gate`; after acquiring it the store
    /// is re-read, and if the access token already changed another request
    /// completed the refresh while we waited — the pending refresh is
    /// skipped.
    ///
    /// Any failure of the refresh call itself maps to
    /// [`ApiError::Unauthenticated`]. The existing pair is left in place so
    /// the caller decides whether to clear it.
    async fn refresh_access_token(&self, stale_access: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let Some(pair) = self.store.load() else {
            return Err(ApiError::Unauthenticated);
        };
        if stale_access != Some(pair.access.as_str()) {
            // Another request refreshed while we waited on the gate.
            return Ok(pair.access);
        }

        tracing::warn!("access token rejected; refreshing session credentials");
        let body = serde_json::json!({ "refresh": pair.refresh });
        let response = match self
            .send_once(Method::POST, "token/refresh/", Some(&body), None)
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "token refresh rejected");
                return Err(ApiError::Unauthenticated);
            }
            Err(error) => {
                tracing::warn!(error = %error, "token refresh call failed");
                return Err(ApiError::Unauthenticated);
            }
        };

        let Ok(rotated) = response.json::<TokenRefreshResponse>().await else {
            return Err(ApiError::Unauthenticated);
        };

        let access = rotated.access.clone();
        self.store.store(TokenPair {
            access: rotated.access,
            // Servers without refresh rotation keep the old refresh token
            // valid and omit it from the response.
            refresh: rotated.refresh.unwrap_or(pair.refresh),
        });
        Ok(access)
    }

    /// Builds and sends one HTTP request. No retry logic lives here.
    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        access: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url);
        if let Some(token) = access {
            request = request.bearer_auth(token);
        }
        if let Some(json) = body {
            request = request.json(json);
        }
        request.send().await.map_err(|e| Self::transport_error(path, e))
    }

    /// Resolves `path` against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                input: path.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Maps a transport failure, distinguishing the configured timeout from
    /// other connection-level errors.
    fn transport_error(path: &str, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout {
                path: path.to_owned(),
            }
        } else {
            ApiError::Http(error)
        }
    }

    /// Asserts a 2xx status, surfacing anything else verbatim.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }

    /// Reads the body and deserializes it as `T`.
    async fn read_json<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response
            .text()
            .await
            .map_err(|e| Self::transport_error(path, e))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: path.to_owned(),
            source: e,
        })
    }
}
