//! File-backed credential store.
//!
//! Persists the session token pair as JSON so a login survives across CLI
//! runs. The pair is written whole via a temp-file rename, and the file is
//! restricted to owner read/write on unix.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use carelink_api::{CredentialStore, TokenPair};

pub struct FileCredentialStore {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    fn read_pair(&self) -> Option<TokenPair> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(pair) => Some(pair),
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "discarding unreadable credential file");
                None
            }
        }
    }

    fn write_pair(&self, pair: &TokenPair) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let rendered = serde_json::to_string(pair).map_err(io::Error::other)?;
        // Write-then-rename so a crash mid-write never leaves a torn pair.
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, rendered)?;
        restrict_permissions(&staging)?;
        fs::rename(&staging, &self.path)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<TokenPair> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_pair()
    }

    fn store(&self, pair: TokenPair) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = self.write_pair(&pair) {
            tracing::error!(path = %self.path.display(), %error, "failed to persist session credentials");
        }
    }

    fn clear(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = fs::remove_file(&self.path) {
            if error.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), %error, "failed to remove credential file");
            }
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("carelink-store-{}-{name}.json", std::process::id()))
    }

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access: access.to_owned(),
            refresh: refresh.to_owned(),
        }
    }

    #[test]
    fn load_is_empty_when_no_file_exists() {
        let store = FileCredentialStore::new(scratch_path("missing"));
        assert!(store.load().is_none());
    }

    #[test]
    fn stored_pair_round_trips_through_disk() {
        let path = scratch_path("roundtrip");
        let store = FileCredentialStore::new(path.clone());
        store.store(pair("a1", "r1"));

        // A second store instance sees the same pair: survives "restarts".
        let reopened = FileCredentialStore::new(path.clone());
        let loaded = reopened.load().expect("pair should persist");
        assert_eq!(loaded.access, "a1");
        assert_eq!(loaded.refresh, "r1");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn store_replaces_the_whole_pair() {
        let path = scratch_path("replace");
        let store = FileCredentialStore::new(path.clone());
        store.store(pair("a1", "r1"));
        store.store(pair("a2", "r2"));
        let loaded = store.load().expect("pair should persist");
        assert_eq!(loaded.access, "a2");
        assert_eq!(loaded.refresh, "r2");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn clear_removes_the_file() {
        let path = scratch_path("clear");
        let store = FileCredentialStore::new(path.clone());
        store.store(pair("a1", "r1"));
        store.clear();
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_reads_as_no_session() {
        let path = scratch_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let store = FileCredentialStore::new(path.clone());
        assert!(store.load().is_none());

        let _ = fs::remove_file(path);
    }

    #[cfg(unix)]
    #[test]
    fn credential_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let path = scratch_path("perms");
        let store = FileCredentialStore::new(path.clone());
        store.store(pair("a1", "r1"));
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "mode was {mode:o}");

        let _ = fs::remove_file(path);
    }
}
