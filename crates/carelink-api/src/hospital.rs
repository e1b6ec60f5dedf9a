//! Hospital-dashboard endpoints: the patient queue and incoming admission
//! requests.

use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{
    AcceptedRequest, AdmissionRequest, QueueEntry, QueueEntryUpdate, RejectedRequest,
};

impl ApiClient {
    /// Fetches the hospital's current patient queue, highest priority
    /// first.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] when the session cannot be renewed.
    /// - [`ApiError::RequestFailed`] on any other non-2xx status (403 for
    ///   non-hospital accounts).
    /// - [`ApiError::Http`] / [`ApiError::Timeout`] on transport failure.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn queue(&self) -> Result<Vec<QueueEntry>, ApiError> {
        self.request(Method::GET, "hospital/queue/", None).await
    }

    /// Admits a patient directly into the queue; the service assigns triage
    /// scores.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::queue`]; admitting a patient already
    /// queued comes back as [`ApiError::RequestFailed`] with status 400.
    pub async fn admit_patient(&self, patient_id: i64) -> Result<QueueEntry, ApiError> {
        let body = serde_json::json!({ "patient_id": patient_id });
        self.request(Method::POST, "hospital/queue/admit/", Some(&body))
            .await
    }

    /// Applies a partial update to a queue entry (status, priority,
    /// estimated service time, notes).
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::queue`].
    pub async fn update_queue_entry(
        &self,
        entry_id: i64,
        update: &QueueEntryUpdate,
    ) -> Result<QueueEntry, ApiError> {
        let body = update.to_body();
        let path = format!("hospital/queue/{entry_id}/update/");
        self.request(Method::PATCH, &path, Some(&body)).await
    }

    /// Fetches pending admission requests routed to this hospital.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::queue`].
    pub async fn incoming_requests(&self) -> Result<Vec<AdmissionRequest>, ApiError> {
        self.request(Method::GET, "hospital/requests/", None).await
    }

    /// Accepts a pending admission request, adding the patient to the
    /// queue.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::queue`]; an unknown or already-decided
    /// request comes back as [`ApiError::RequestFailed`] with status 404.
    pub async fn accept_request(&self, request_id: i64) -> Result<AcceptedRequest, ApiError> {
        let path = format!("hospital/requests/{request_id}/accept/");
        self.request(Method::POST, &path, None).await
    }

    /// Rejects a pending admission request.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::queue`].
    pub async fn reject_request(&self, request_id: i64) -> Result<RejectedRequest, ApiError> {
        let path = format!("hospital/requests/{request_id}/reject/");
        self.request(Method::POST, &path, None).await
    }
}
