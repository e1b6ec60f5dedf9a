//! Session credential storage.
//!
//! The client holds exactly one access/refresh pair per logged-in session.
//! [`CredentialStore`] is the seam between the retry logic and whatever
//! persistence the host platform provides; `store` always replaces the
//! whole pair in a single write so no reader ever observes an old access
//! token alongside a new refresh token or vice versa.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// An access/refresh bearer-token pair. Both values are opaque strings
/// minted by the coordination service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[redacted]")
            .field("refresh", &"[redacted]")
            .finish()
    }
}

/// Storage slot for the session's token pair.
///
/// Owned exclusively by the [`ApiClient`](crate::ApiClient); no other
/// component reads or writes tokens directly. Implementations must make
/// `store` atomic with respect to `load` — the pair is replaced
/// both-or-neither.
pub trait CredentialStore: Send + Sync {
    /// Returns the current pair, if a session is active.
    fn load(&self) -> Option<TokenPair>;

    /// Replaces the stored pair in one atomic write.
    fn store(&self, pair: TokenPair);

    /// Discards the stored pair, ending the session.
    fn clear(&self);
}

/// In-memory credential store for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Option<TokenPair>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<TokenPair> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, pair: TokenPair) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(pair);
    }

    fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access: access.to_owned(),
            refresh: refresh.to_owned(),
        }
    }

    #[test]
    fn load_is_empty_before_any_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().is_none());
    }

    #[test]
    fn store_replaces_the_whole_pair() {
        let store = MemoryCredentialStore::new();
        store.store(pair("a1", "r1"));
        store.store(pair("a2", "r2"));
        let loaded = store.load().unwrap();
        assert_eq!(loaded.access, "a2");
        assert_eq!(loaded.refresh, "r2");
    }

    #[test]
    fn clear_ends_the_session() {
        let store = MemoryCredentialStore::new();
        store.store(pair("a1", "r1"));
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn debug_output_redacts_token_material() {
        let rendered = format!("{:?}", pair("secret-access", "secret-refresh"));
        assert!(!rendered.contains("secret-access"), "got: {rendered}");
        assert!(!rendered.contains("secret-refresh"), "got: {rendered}");
    }
}
