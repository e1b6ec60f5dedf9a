//! Registration and session endpoints.

use reqwest::Method;

use crate::client::ApiClient;
use crate::credentials::TokenPair;
use crate::error::ApiError;
use crate::types::{NewAccount, RegisteredAccount};

impl ApiClient {
    /// Registers a new patient or hospital account.
    ///
    /// Public endpoint; no credentials are attached or stored. Hospital
    /// accounts come back `pending_verification` until an administrator
    /// approves them.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RequestFailed`] on validation failure (400) or any
    ///   other non-2xx status.
    /// - [`ApiError::Http`] / [`ApiError::Timeout`] on transport failure.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn register(&self, account: &NewAccount) -> Result<RegisteredAccount, ApiError> {
        let body = account.to_body();
        self.request_public(Method::POST, "register/", Some(&body))
            .await
    }

    /// Exchanges a username and password for a token pair and stores it.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RequestFailed`] with status 401 on bad credentials;
    ///   the stored pair (if any) is left untouched.
    /// - [`ApiError::Http`] / [`ApiError::Timeout`] on transport failure.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let pair: TokenPair = self
            .request_public(Method::POST, "token/", Some(&body))
            .await?;
        self.credential_store().store(pair.clone());
        tracing::debug!(username, "session established");
        Ok(pair)
    }

    /// Ends the session client-side by discarding the stored token pair.
    ///
    /// The service keeps no session state beyond token validity, so there
    /// is nothing to call remotely.
    pub fn logout(&self) {
        self.credential_store().clear();
    }
}
