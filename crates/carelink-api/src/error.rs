use thiserror::Error;

/// Errors returned by the coordination API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credentials remain after at most one refresh attempt.
    /// Callers must treat the session as ended and route to login; retrying
    /// the call will not succeed.
    #[error("not authenticated: session credentials are missing or expired")]
    Unauthenticated,

    /// The service rejected the request for a reason other than token
    /// expiry. Surfaced verbatim and never retried.
    #[error("request failed with HTTP status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// No response within the configured bound. Terminal for this call;
    /// never retried.
    #[error("request to {path} timed out")]
    Timeout { path: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The base URL or a request path could not be parsed.
    #[error("invalid URL \"{input}\": {reason}")]
    InvalidUrl { input: String, reason: String },
}
