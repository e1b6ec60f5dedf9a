//! Domain types shared across the carelink client.
//!
//! Hospitals are sourced fresh from the coordination service on each fetch,
//! held only in memory, and never mutated by the client. A fetch produces a
//! [`HospitalDirectory`] snapshot stamped with its retrieval time so callers
//! can refuse to act on stale wait-time data.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A WGS-84 position in decimal degrees.
///
/// No range validation is performed here; callers are responsible for
/// supplying valid values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A hospital as reported by the coordination service's public map endpoint,
/// including its live wait-time estimate.
///
/// `wait_minutes` is the server-computed sum of estimated service times for
/// patients currently waiting or in progress; the client treats it as
/// authoritative and read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    #[serde(rename = "hospital_name")]
    pub name: String,
    pub address: String,
    #[serde(rename = "phone_number", default)]
    pub phone: String,
    #[serde(deserialize_with = "decimal_degrees")]
    pub latitude: f64,
    #[serde(deserialize_with = "decimal_degrees")]
    pub longitude: f64,
    #[serde(rename = "current_wait_time")]
    pub wait_minutes: u32,
}

impl Hospital {
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One fetch of the hospital list, stamped with its retrieval time.
///
/// Wait times are only meaningful near the moment they were reported, so a
/// snapshot older than the configured maximum age should be refetched rather
/// than scored.
#[derive(Debug, Clone)]
pub struct HospitalDirectory {
    pub hospitals: Vec<Hospital>,
    pub fetched_at: DateTime<Utc>,
}

impl HospitalDirectory {
    #[must_use]
    pub fn new(hospitals: Vec<Hospital>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            hospitals,
            fetched_at,
        }
    }

    /// Returns `true` when the snapshot is older than `max_age` at `now`.
    #[must_use]
    pub fn is_stale(&self, max_age: TimeDelta, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) > max_age
    }
}

/// Deserializes a decimal-degree value that may arrive as a JSON number or
/// as a decimal string.
///
/// The coordination service stores coordinates as fixed-point decimals and
/// its JSON renderer emits them as strings; older deployments emitted plain
/// numbers. Accepting both keeps the client compatible with either.
///
/// # Errors
///
/// Returns a deserialization error if the value is neither a number nor a
/// string parseable as one.
pub fn decimal_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(deserializer)? {
        Degrees::Number(value) => Ok(value),
        Degrees::Text(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toronto_general() -> serde_json::Value {
        serde_json::json!({
            "id": 3,
            "hospital_name": "Toronto General",
            "address": "200 Elizabeth St",
            "phone_number": "416-340-4800",
            "latitude": "43.658100",
            "longitude": "-79.387800",
            "current_wait_time": 45
        })
    }

    #[test]
    fn hospital_parses_decimal_string_coordinates() {
        let hospital: Hospital = serde_json::from_value(toronto_general()).unwrap();
        assert_eq!(hospital.name, "Toronto General");
        assert!((hospital.latitude - 43.6581).abs() < 1e-9);
        assert!((hospital.longitude - (-79.3878)).abs() < 1e-9);
        assert_eq!(hospital.wait_minutes, 45);
    }

    #[test]
    fn hospital_parses_numeric_coordinates() {
        let mut body = toronto_general();
        body["latitude"] = serde_json::json!(43.6581);
        body["longitude"] = serde_json::json!(-79.3878);
        let hospital: Hospital = serde_json::from_value(body).unwrap();
        assert!((hospital.coordinate().latitude - 43.6581).abs() < 1e-9);
    }

    #[test]
    fn hospital_rejects_unparseable_coordinate() {
        let mut body = toronto_general();
        body["latitude"] = serde_json::json!("not-a-degree");
        let result = serde_json::from_value::<Hospital>(body);
        assert!(result.is_err(), "expected parse failure, got: {result:?}");
    }

    #[test]
    fn hospital_tolerates_missing_phone() {
        let mut body = toronto_general();
        body.as_object_mut().unwrap().remove("phone_number");
        let hospital: Hospital = serde_json::from_value(body).unwrap();
        assert_eq!(hospital.phone, "");
    }

    #[test]
    fn directory_fresh_within_max_age() {
        let fetched = Utc::now();
        let directory = HospitalDirectory::new(Vec::new(), fetched);
        let now = fetched + TimeDelta::seconds(299);
        assert!(!directory.is_stale(TimeDelta::seconds(300), now));
    }

    #[test]
    fn directory_stale_past_max_age() {
        let fetched = Utc::now();
        let directory = HospitalDirectory::new(Vec::new(), fetched);
        let now = fetched + TimeDelta::seconds(301);
        assert!(directory.is_stale(TimeDelta::seconds(300), now));
    }
}
