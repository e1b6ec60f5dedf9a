//! HTTP client for the carelink coordination API.
//!
//! Wraps `reqwest` with bearer-token authentication, a one-shot token
//! refresh on 401 responses, and typed wrappers for every endpoint the
//! patient and hospital apps consume. Credential persistence is behind the
//! [`CredentialStore`] trait so the storage mechanism stays a caller
//! concern.

mod auth;
mod client;
mod credentials;
mod error;
mod hospital;
mod patient;
pub mod types;

pub use client::ApiClient;
pub use credentials::{CredentialStore, MemoryCredentialStore, TokenPair};
pub use error::ApiError;
