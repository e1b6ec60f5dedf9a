//! Patient-side endpoints: profiles, the hospital map, emergencies and
//! admission requests.

use carelink_core::{Coordinate, Hospital};
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    Account, AccountUpdate, AdmissionOutcome, DispatchOutcome, EmergencyCallOutcome,
    MedicalProfileUpdate, SessionProfile,
};

impl ApiClient {
    /// Fetches the lightweight session identity used to route the user to
    /// the right app surface after login.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] when the session cannot be renewed.
    /// - [`ApiError::RequestFailed`] on any other non-2xx status.
    /// - [`ApiError::Http`] / [`ApiError::Timeout`] on transport failure.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn session_profile(&self) -> Result<SessionProfile, ApiError> {
        self.request(Method::GET, "user/profile/", None).await
    }

    /// Fetches the full account record, including the medical or hospital
    /// profile matching the account's kind.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn account(&self) -> Result<Account, ApiError> {
        self.request(Method::GET, "profile/", None).await
    }

    /// Applies a partial update to the account's username or email.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`]; a conflicting
    /// username or email comes back as [`ApiError::RequestFailed`] with
    /// status 400.
    pub async fn update_account(&self, update: &AccountUpdate) -> Result<Account, ApiError> {
        let body = update.to_body();
        self.request(Method::PATCH, "user/update/", Some(&body))
            .await
    }

    /// Applies a partial update to the patient's medical profile.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn update_medical_profile(
        &self,
        update: &MedicalProfileUpdate,
    ) -> Result<Account, ApiError> {
        let body = update.to_body();
        self.request(Method::PUT, "profile/", Some(&body)).await
    }

    /// Fetches all verified hospitals with their live wait-time estimates.
    ///
    /// Public endpoint, but sent authenticated like every other call so a
    /// logged-in session behaves uniformly. The result is a fresh snapshot;
    /// callers stamp it and refetch once it exceeds the configured max age.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn list_hospitals(&self) -> Result<Vec<Hospital>, ApiError> {
        self.request(Method::GET, "hospitals/", None).await
    }

    /// Triggers an emergency call relay with the patient's stored medical
    /// details.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn emergency_call(&self) -> Result<EmergencyCallOutcome, ApiError> {
        self.request(Method::POST, "emergency-call/", None).await
    }

    /// Asks the dispatch service for an emergency hospital recommendation
    /// for a patient at `location`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn emergency_dispatch(
        &self,
        location: Coordinate,
    ) -> Result<DispatchOutcome, ApiError> {
        let body = serde_json::json!({
            "latitude": location.latitude,
            "longitude": location.longitude,
        });
        self.request(Method::POST, "emergency/dispatch/", Some(&body))
            .await
    }

    /// Submits an admission request and returns the service's recommended
    /// hospital with its reasoning.
    ///
    /// The service rate-limits patients to one request per day; exceeding
    /// it comes back as [`ApiError::RequestFailed`] with status 429.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::session_profile`].
    pub async fn request_admission(
        &self,
        reason_for_visit: &str,
        location: Coordinate,
    ) -> Result<AdmissionOutcome, ApiError> {
        let body = serde_json::json!({
            "reason_for_visit": reason_for_visit,
            "latitude": location.latitude,
            "longitude": location.longitude,
        });
        self.request(Method::POST, "request-admission/", Some(&body))
            .await
    }
}
