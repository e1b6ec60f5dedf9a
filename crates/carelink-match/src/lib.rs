//! Hospital recommendation scoring.
//!
//! Ranks hospitals by a composite time-to-treatment estimate: great-circle
//! travel time at an assumed average speed plus the hospital's reported wait
//! time. A pure function library — no I/O, no shared state, safe to call
//! concurrently.

pub mod error;
pub mod geo;
pub mod scorer;

pub use error::MatchError;
pub use geo::distance_km;
pub use scorer::{
    rank, rank_with, recommend, recommend_with, travel_time_minutes, ScoredHospital, TravelProfile,
};
