use thiserror::Error;

/// Errors returned by the recommendation scorer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The caller supplied zero hospitals. Surfaced as an error rather than
    /// a sentinel so callers present a distinct "no hospitals available"
    /// state instead of a degenerate recommendation.
    #[error("no hospitals available to rank")]
    NoHospitals,
}
