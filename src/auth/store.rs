use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::StoredCredential;
use crate::error::CrmError;

/// Well-known key holding the bearer access credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Legacy refresh marker. Never written by this crate, but removed whenever a
/// session ends so stale markers from older clients do not linger.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key-value storage for persisted session credentials.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<StoredCredential>, CrmError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CrmError>;
    fn remove(&self, key: &str) -> Result<(), CrmError>;

    /// Current access credential, if any.
    fn access_token(&self) -> Result<Option<String>, CrmError> {
        Ok(self.get(ACCESS_TOKEN_KEY)?.map(|c| c.value))
    }

    /// Remove the access credential and the refresh marker.
    fn clear_session(&self) -> Result<(), CrmError> {
        self.remove(ACCESS_TOKEN_KEY)?;
        self.remove(REFRESH_TOKEN_KEY)
    }
}

/// Process-local store; credentials vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding an access credential.
    pub fn with_access_token(token: &str) -> Self {
        let store = Self::new();
        store.insert(ACCESS_TOKEN_KEY, token);
        store
    }

    fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), StoredCredential::now(value));
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Result<Option<StoredCredential>, CrmError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CrmError::InvalidState("credential store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CrmError> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CrmError> {
        self.entries
            .lock()
            .map_err(|_| CrmError::InvalidState("credential store lock poisoned".into()))?
            .remove(key);
        Ok(())
    }
}

/// File-backed store keeping every key in one TOML file.
///
/// # Example
/// ```no_run
/// use crm_client::auth::{CredentialStore, FileCredentialStore};
///
/// let store = FileCredentialStore::new(std::path::PathBuf::from("/tmp/crm"));
/// store.set("accessToken", "eyJhbGciOi...")?;
/// # Ok::<(), crm_client::error::CrmError>(())
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub const FILE_NAME: &'static str = "credentials.toml";

    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            path: base_dir.join(Self::FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<CredentialFile, CrmError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialFile::default())
            }
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&raw)?)
    }

    fn write_file(&self, file: &CredentialFile) -> Result<(), CrmError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string(file)?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), CrmError>
    where
        F: FnOnce(&mut BTreeMap<String, StoredCredential>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CrmError::InvalidState("credential file lock poisoned".into()))?;
        let mut file = self.read_file()?;
        mutate(&mut file.entries);
        file.version = CREDENTIAL_FILE_VERSION;
        file.saved_at = Some(Utc::now());
        self.write_file(&file)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<StoredCredential>, CrmError> {
        Ok(self.read_file()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CrmError> {
        self.update(|entries| {
            entries.insert(key.to_string(), StoredCredential::now(value));
        })
    }

    fn remove(&self, key: &str) -> Result<(), CrmError> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

const CREDENTIAL_FILE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, StoredCredential>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileCredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn file_store_round_trip_works() {
        let (_dir, store) = temp_store();
        store.set(ACCESS_TOKEN_KEY, "access").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("access"));

        let reopened = FileCredentialStore::new(store.path().parent().unwrap().to_path_buf());
        assert_eq!(reopened.access_token().unwrap().as_deref(), Some("access"));
    }

    #[test]
    fn clear_session_removes_access_and_marker() {
        let (_dir, store) = temp_store();
        store.set(ACCESS_TOKEN_KEY, "access").unwrap();
        store.set(REFRESH_TOKEN_KEY, "legacy").unwrap();
        store.set("theme", "dark").unwrap();

        store.clear_session().unwrap();

        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).unwrap().is_none());
        assert!(store.get("theme").unwrap().is_some());
    }

    #[test]
    fn remove_on_missing_file_is_noop() {
        let (_dir, store) = temp_store();
        store.remove(ACCESS_TOKEN_KEY).unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store.set(ACCESS_TOKEN_KEY, "access").unwrap();
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryCredentialStore::with_access_token("T1");
        store.set(ACCESS_TOKEN_KEY, "T2").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("T2"));
        store.clear_session().unwrap();
        assert!(store.access_token().unwrap().is_none());
    }
}
