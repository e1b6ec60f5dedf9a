//! Coordination API wire types.
//!
//! All types model the JSON structures exchanged with the coordination
//! service. Decimal fields (coordinates) may arrive as strings or numbers
//! depending on the server's JSON renderer; the lenient
//! [`decimal_degrees`](carelink_core::types::decimal_degrees) deserializer
//! accepts both. Timestamps are ISO-8601 with timezone.

use carelink_core::types::decimal_degrees;
use carelink_core::Hospital;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Response from the token-refresh endpoint.
///
/// The rotated `refresh` token is only present when the server has refresh
/// rotation enabled; when absent the previous refresh token stays valid and
/// is carried forward into the stored pair.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenRefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// A new account registration. Patients and hospitals register with
/// different required fields, so the two shapes are separate variants.
#[derive(Debug, Clone)]
pub enum NewAccount {
    Patient {
        username: String,
        password: String,
        email: String,
        /// Required for patient accounts, `YYYY-MM-DD`.
        date_of_birth: NaiveDate,
    },
    Hospital {
        username: String,
        password: String,
        email: String,
        hospital_name: String,
        address: String,
        phone_number: String,
    },
}

impl NewAccount {
    pub(crate) fn to_body(&self) -> serde_json::Value {
        match self {
            NewAccount::Patient {
                username,
                password,
                email,
                date_of_birth,
            } => serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
                "user_type": "patient",
                "date_of_birth": date_of_birth.to_string(),
            }),
            NewAccount::Hospital {
                username,
                password,
                email,
                hospital_name,
                address,
                phone_number,
            } => serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
                "user_type": "hospital",
                "hospital_name": hospital_name,
                "address": address,
                "phone_number": phone_number,
            }),
        }
    }
}

/// Acknowledgement returned by the registration endpoint.
#[derive(Debug, Deserialize)]
pub struct RegisteredAccount {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserKind,
    pub message: String,
    /// `pending_verification` for hospital accounts awaiting review.
    #[serde(default)]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts and profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Patient,
    Hospital,
}

/// Lightweight session identity from `user/profile/`, used at login to
/// decide which app surface to show.
#[derive(Debug, Deserialize)]
pub struct SessionProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserKind,
    pub is_verified: bool,
    #[serde(default)]
    pub has_medical_profile: Option<bool>,
    #[serde(default)]
    pub medical_profile_complete: Option<bool>,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub has_hospital_profile: Option<bool>,
}

/// Full account record from `profile/`, with whichever nested profile
/// matches the account's kind.
#[derive(Debug, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub user_type: UserKind,
    pub is_verified: bool,
    #[serde(default)]
    pub profile: Option<MedicalProfile>,
    #[serde(default)]
    pub hospital_profile: Option<HospitalContact>,
}

/// A patient's medical profile. Free-text fields arrive as empty strings
/// when unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicalProfile {
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub pre_existing_conditions: String,
    #[serde(default)]
    pub emergency_notes: String,
}

/// Partial update for a patient's medical profile; only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct MedicalProfileUpdate {
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub pre_existing_conditions: Option<String>,
    pub emergency_notes: Option<String>,
}

impl MedicalProfileUpdate {
    pub(crate) fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(dob) = &self.date_of_birth {
            body.insert("date_of_birth".to_owned(), serde_json::json!(dob.to_string()));
        }
        if let Some(address) = &self.address {
            body.insert("address".to_owned(), serde_json::json!(address));
        }
        if let Some(allergies) = &self.allergies {
            body.insert("allergies".to_owned(), serde_json::json!(allergies));
        }
        if let Some(conditions) = &self.pre_existing_conditions {
            body.insert(
                "pre_existing_conditions".to_owned(),
                serde_json::json!(conditions),
            );
        }
        if let Some(notes) = &self.emergency_notes {
            body.insert("emergency_notes".to_owned(), serde_json::json!(notes));
        }
        serde_json::Value::Object(body)
    }
}

/// Partial update for the account itself; only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl AccountUpdate {
    pub(crate) fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(username) = &self.username {
            body.insert("username".to_owned(), serde_json::json!(username));
        }
        if let Some(email) = &self.email {
            body.insert("email".to_owned(), serde_json::json!(email));
        }
        serde_json::Value::Object(body)
    }
}

/// Contact card for a hospital account, embedded in [`Account`].
#[derive(Debug, Clone, Deserialize)]
pub struct HospitalContact {
    pub hospital_name: String,
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
}

// ---------------------------------------------------------------------------
// Queue (hospital dashboard)
// ---------------------------------------------------------------------------

/// Processing state of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

/// The patient summary nested in a queue entry.
#[derive(Debug, Deserialize)]
pub struct QueuedPatient {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub medical_profile: Option<MedicalProfile>,
}

/// One patient in a hospital's queue, with triage scores assigned at
/// admission.
#[derive(Debug, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub patient: QueuedPatient,
    pub hospital_name: String,
    pub admitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 1 (lowest) to 10 (highest urgency).
    pub priority_score: i32,
    /// Estimated service time in minutes.
    pub estimated_service_time: u32,
    pub status: QueueStatus,
    #[serde(default)]
    pub notes: String,
}

/// Partial update for a queue entry; only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct QueueEntryUpdate {
    pub status: Option<QueueStatus>,
    pub priority_score: Option<i32>,
    pub estimated_service_time: Option<u32>,
    pub notes: Option<String>,
}

impl QueueEntryUpdate {
    pub(crate) fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(status) = &self.status {
            body.insert("status".to_owned(), serde_json::json!(status));
        }
        if let Some(priority) = self.priority_score {
            body.insert("priority_score".to_owned(), serde_json::json!(priority));
        }
        if let Some(minutes) = self.estimated_service_time {
            body.insert(
                "estimated_service_time".to_owned(),
                serde_json::json!(minutes),
            );
        }
        if let Some(notes) = &self.notes {
            body.insert("notes".to_owned(), serde_json::json!(notes));
        }
        serde_json::Value::Object(body)
    }
}

// ---------------------------------------------------------------------------
// Admission requests and dispatch
// ---------------------------------------------------------------------------

/// Lifecycle state of an admission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

/// An admission request as seen from the hospital dashboard.
#[derive(Debug, Deserialize)]
pub struct AdmissionRequest {
    pub id: i64,
    pub patient_name: String,
    pub reason_for_visit: String,
    #[serde(deserialize_with = "decimal_degrees")]
    pub patient_latitude: f64,
    #[serde(deserialize_with = "decimal_degrees")]
    pub patient_longitude: f64,
    pub hospital_name: String,
    /// The service's explanation for why this hospital was recommended.
    pub ai_reasoning: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of submitting an admission request: the service's pick plus its
/// explanation.
#[derive(Debug, Deserialize)]
pub struct AdmissionOutcome {
    pub request_id: i64,
    pub recommended_hospital: Hospital,
    pub reasoning: String,
    pub status: RequestStatus,
}

/// Outcome of an emergency dispatch call.
#[derive(Debug, Deserialize)]
pub struct DispatchOutcome {
    pub recommended_hospital: Hospital,
    pub reasoning: String,
    /// Script the dispatcher reads to the emergency operator.
    pub tts_script_for_911: String,
}

/// Acknowledgement for a triggered emergency call.
#[derive(Debug, Deserialize)]
pub struct EmergencyCallOutcome {
    pub status: String,
    pub message: String,
}

/// Response to accepting an admission request: the new queue entry.
#[derive(Debug, Deserialize)]
pub struct AcceptedRequest {
    pub message: String,
    pub queue_entry: QueueEntry,
}

/// Response to rejecting an admission request.
#[derive(Debug, Deserialize)]
pub struct RejectedRequest {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_entry_parses_service_payload() {
        let body = serde_json::json!({
            "id": 11,
            "patient": {
                "id": 4,
                "username": "jdoe",
                "email": "jdoe@example.org",
                "medical_profile": {
                    "date_of_birth": "1990-03-14",
                    "address": "22 King St",
                    "allergies": "penicillin",
                    "pre_existing_conditions": "",
                    "emergency_notes": ""
                }
            },
            "hospital_name": "Toronto General",
            "admitted_at": "2025-06-01T14:30:00.000000Z",
            "updated_at": "2025-06-01T15:02:11.000000Z",
            "priority_score": 7,
            "estimated_service_time": 25,
            "status": "in_progress",
            "notes": ""
        });
        let entry: QueueEntry = serde_json::from_value(body).unwrap();
        assert_eq!(entry.patient.username, "jdoe");
        assert_eq!(entry.status, QueueStatus::InProgress);
        assert_eq!(entry.estimated_service_time, 25);
        let profile = entry.patient.medical_profile.unwrap();
        assert_eq!(profile.allergies, "penicillin");
    }

    #[test]
    fn admission_request_parses_decimal_string_location() {
        let body = serde_json::json!({
            "id": 5,
            "patient_name": "jdoe",
            "reason_for_visit": "persistent chest pain",
            "patient_latitude": "43.700000000000000",
            "patient_longitude": "-79.420000000000000",
            "hospital_name": "Toronto General",
            "ai_reasoning": "Closest facility with capacity",
            "status": "pending",
            "created_at": "2025-06-01T14:30:00Z",
            "updated_at": "2025-06-01T14:30:00Z"
        });
        let request: AdmissionRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert!((request.patient_latitude - 43.70).abs() < 1e-9);
        assert!((request.patient_longitude - (-79.42)).abs() < 1e-9);
    }

    #[test]
    fn medical_profile_update_sends_only_set_fields() {
        let update = MedicalProfileUpdate {
            allergies: Some("latex".to_owned()),
            ..MedicalProfileUpdate::default()
        };
        let body = update.to_body();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["allergies"], "latex");
    }

    #[test]
    fn queue_entry_update_serializes_status_as_wire_value() {
        let update = QueueEntryUpdate {
            status: Some(QueueStatus::Completed),
            ..QueueEntryUpdate::default()
        };
        let body = update.to_body();
        assert_eq!(body["status"], "completed");
    }

    #[test]
    fn patient_registration_body_carries_user_type() {
        let account = NewAccount::Patient {
            username: "jdoe".to_owned(),
            password: "hunter22".to_owned(),
            email: "jdoe@example.org".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
        };
        let body = account.to_body();
        assert_eq!(body["user_type"], "patient");
        assert_eq!(body["date_of_birth"], "1990-03-14");
    }
}
