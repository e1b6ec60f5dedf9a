//! Composite time-to-treatment scoring.
//!
//! `score = travel minutes + reported wait minutes`. The sum is deliberately
//! unweighted so the result stays explainable to the patient ("X min travel
//! + Y min wait"); the travel model is a flat average speed, not a routing
//! engine.

use carelink_core::{Coordinate, Hospital};
use serde::Serialize;

use crate::error::MatchError;
use crate::geo::distance_km;

/// Assumed average speed for the travel-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelProfile {
    /// A patient driving themselves.
    Driving,
    /// An emergency vehicle en route.
    Ambulance,
}

impl TravelProfile {
    #[must_use]
    pub fn speed_kmh(self) -> f64 {
        match self {
            TravelProfile::Driving => 40.0,
            TravelProfile::Ambulance => 60.0,
        }
    }
}

/// A hospital annotated with its computed travel time and composite score.
///
/// Derived and ephemeral: recomputed whenever the hospital list or the user
/// location changes.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredHospital {
    pub hospital: Hospital,
    pub distance_km: f64,
    pub travel_minutes: u32,
    /// `travel_minutes + hospital.wait_minutes`.
    pub score: u32,
}

/// Estimated driving time in whole minutes for a distance in kilometres.
///
/// Distance over a flat 40 km/h average, rounded to the nearest minute.
/// A deliberate approximation that ignores road networks, traffic and
/// transport mode.
#[must_use]
pub fn travel_time_minutes(distance_km: f64) -> u32 {
    travel_minutes_at(distance_km, TravelProfile::Driving.speed_kmh())
}

fn travel_minutes_at(distance_km: f64, speed_kmh: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        ((distance_km / speed_kmh) * 60.0).round().max(0.0) as u32
    }
}

/// Ranks `hospitals` ascending by composite score for a user at `user`,
/// using the [`TravelProfile::Driving`] travel model.
///
/// The sort is stable: hospitals with equal scores keep their input order.
///
/// # Errors
///
/// Returns [`MatchError::NoHospitals`] when `hospitals` is empty.
pub fn rank(user: Coordinate, hospitals: &[Hospital]) -> Result<Vec<ScoredHospital>, MatchError> {
    rank_with(user, hospitals, TravelProfile::Driving)
}

/// Ranks `hospitals` ascending by composite score under the given profile.
///
/// # Errors
///
/// Returns [`MatchError::NoHospitals`] when `hospitals` is empty.
pub fn rank_with(
    user: Coordinate,
    hospitals: &[Hospital],
    profile: TravelProfile,
) -> Result<Vec<ScoredHospital>, MatchError> {
    if hospitals.is_empty() {
        return Err(MatchError::NoHospitals);
    }

    let mut scored: Vec<ScoredHospital> = hospitals
        .iter()
        .map(|hospital| {
            let distance_km = distance_km(user, hospital.coordinate());
            let travel_minutes = travel_minutes_at(distance_km, profile.speed_kmh());
            ScoredHospital {
                score: travel_minutes + hospital.wait_minutes,
                hospital: hospital.clone(),
                distance_km,
                travel_minutes,
            }
        })
        .collect();

    scored.sort_by_key(|s| s.score);
    Ok(scored)
}

/// Returns the single best recommendation: the first element of [`rank`].
///
/// # Errors
///
/// Returns [`MatchError::NoHospitals`] when `hospitals` is empty.
pub fn recommend(user: Coordinate, hospitals: &[Hospital]) -> Result<ScoredHospital, MatchError> {
    recommend_with(user, hospitals, TravelProfile::Driving)
}

/// Returns the single best recommendation under the given profile.
///
/// # Errors
///
/// Returns [`MatchError::NoHospitals`] when `hospitals` is empty.
pub fn recommend_with(
    user: Coordinate,
    hospitals: &[Hospital],
    profile: TravelProfile,
) -> Result<ScoredHospital, MatchError> {
    let mut ranked = rank_with(user, hospitals, profile)?;
    Ok(ranked.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(id: i64, latitude: f64, longitude: f64, wait_minutes: u32) -> Hospital {
        Hospital {
            id,
            name: format!("Hospital {id}"),
            address: "1 Test Way".to_owned(),
            phone: String::new(),
            latitude,
            longitude,
            wait_minutes,
        }
    }

    #[test]
    fn travel_time_rounds_to_nearest_minute() {
        // 10 km at 40 km/h is exactly 15 minutes.
        assert_eq!(travel_time_minutes(10.0), 15);
        // 0.2 km -> 0.3 min rounds down; 0.4 km -> 0.6 min rounds up.
        assert_eq!(travel_time_minutes(0.2), 0);
        assert_eq!(travel_time_minutes(0.4), 1);
        // 6.2 km -> 9.3 min; 6.4 km -> 9.6 min.
        assert_eq!(travel_time_minutes(6.2), 9);
        assert_eq!(travel_time_minutes(6.4), 10);
    }

    #[test]
    fn travel_time_is_monotonic_in_distance() {
        let mut previous = travel_time_minutes(0.0);
        for step in 1..=200 {
            let current = travel_time_minutes(f64::from(step) * 0.7);
            assert!(
                current >= previous,
                "travel time decreased between steps: {previous} -> {current}"
            );
            previous = current;
        }
    }

    #[test]
    fn ambulance_profile_is_never_slower_than_driving() {
        for step in 0..=50 {
            let d = f64::from(step) * 2.3;
            let driving = travel_minutes_at(d, TravelProfile::Driving.speed_kmh());
            let ambulance = travel_minutes_at(d, TravelProfile::Ambulance.speed_kmh());
            assert!(ambulance <= driving, "at {d} km: {ambulance} > {driving}");
        }
    }

    #[test]
    fn rank_preserves_length_and_sorts_ascending() {
        let user = Coordinate::new(43.70, -79.42);
        let hospitals = vec![
            hospital(1, 43.65, -79.38, 30),
            hospital(2, 43.72, -79.50, 5),
            hospital(3, 43.90, -79.10, 0),
        ];
        let ranked = rank(user, &hospitals).unwrap();
        assert_eq!(ranked.len(), hospitals.len());
        for window in ranked.windows(2) {
            assert!(window[0].score <= window[1].score);
        }
    }

    #[test]
    fn rank_scores_are_travel_plus_wait() {
        let user = Coordinate::new(43.70, -79.42);
        let hospitals = vec![hospital(1, 43.65, -79.38, 30), hospital(2, 43.72, -79.50, 5)];
        let ranked = rank(user, &hospitals).unwrap();
        for scored in &ranked {
            let expected = travel_time_minutes(distance_km(user, scored.hospital.coordinate()))
                + scored.hospital.wait_minutes;
            assert_eq!(scored.score, expected);
        }
    }

    #[test]
    fn rank_breaks_ties_by_input_order() {
        let user = Coordinate::new(0.0, 0.0);
        // Same position and wait: identical scores.
        let hospitals = vec![
            hospital(7, 0.1, 0.1, 10),
            hospital(8, 0.1, 0.1, 10),
            hospital(9, 0.1, 0.1, 10),
        ];
        let ranked = rank(user, &hospitals).unwrap();
        let ids: Vec<i64> = ranked.iter().map(|s| s.hospital.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn recommend_returns_global_minimum() {
        let user = Coordinate::new(43.70, -79.42);
        let hospitals = vec![
            hospital(1, 43.65, -79.38, 30),
            hospital(2, 43.72, -79.50, 5),
            hospital(3, 44.50, -80.00, 0),
        ];
        let best = recommend(user, &hospitals).unwrap();
        let ranked = rank(user, &hospitals).unwrap();
        for scored in &ranked {
            assert!(
                best.score <= scored.score,
                "recommendation {} beaten by hospital {}",
                best.score,
                scored.score
            );
        }
    }

    #[test]
    fn nearby_low_wait_hospital_beats_closer_busy_one() {
        // User in midtown Toronto; the closer hospital has a 30 min wait,
        // the slightly farther one only 5 min.
        let user = Coordinate::new(43.70, -79.42);
        let busy = hospital(1, 43.65, -79.38, 30);
        let quiet = hospital(2, 43.72, -79.50, 5);
        let ranked = rank(user, &[busy, quiet]).unwrap();

        assert_eq!(ranked[0].hospital.id, 2);
        // ~6.80 km -> 10 min travel + 5 min wait.
        assert_eq!(ranked[0].travel_minutes, 10);
        assert_eq!(ranked[0].score, 15);
        // ~6.42 km -> 10 min travel + 30 min wait.
        assert_eq!(ranked[1].travel_minutes, 10);
        assert_eq!(ranked[1].score, 40);
    }

    #[test]
    fn rank_empty_list_is_an_error() {
        let result = rank(Coordinate::new(0.0, 0.0), &[]);
        assert!(
            matches!(result, Err(MatchError::NoHospitals)),
            "expected NoHospitals, got: {result:?}"
        );
    }

    #[test]
    fn recommend_empty_list_is_an_error() {
        let result = recommend(Coordinate::new(0.0, 0.0), &[]);
        assert!(
            matches!(result, Err(MatchError::NoHospitals)),
            "expected NoHospitals, got: {result:?}"
        );
    }

    #[test]
    fn ambulance_profile_shortens_travel_component() {
        let user = Coordinate::new(43.70, -79.42);
        let hospitals = vec![hospital(1, 43.40, -79.80, 0)];
        let driving = recommend(user, &hospitals).unwrap();
        let dispatched = recommend_with(user, &hospitals, TravelProfile::Ambulance).unwrap();
        assert!(dispatched.travel_minutes < driving.travel_minutes);
    }
}
