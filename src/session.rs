// Session persistence: two string values (phone and user id) kept between
// runs so a returning player skips the login prompt.

use crate::error::SessionError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub const PHONE_KEY: &str = "userPhone";
pub const USER_ID_KEY: &str = "userId";

/// Minimal key-value store for session values.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Store backed by a small JSON object file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/sportcards/session.json`, or the home directory if the
    /// platform has no config dir.
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SessionError::NoConfigDir)?;
        Ok(Self::new(dir.join("sportcards").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// In-process store; nothing survives the process. Used as a test double.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values: Mutex::new(values) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still a valid map.
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// The two values needed to resume a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub user_id: i64,
    pub phone: String,
}

impl SavedSession {
    /// Present only if both values are stored and the id is a number.
    pub fn load(store: &dyn SessionStore) -> Result<Option<Self>, SessionError> {
        let phone = store.get(PHONE_KEY)?.filter(|p| !p.trim().is_empty());
        let user_id = store
            .get(USER_ID_KEY)?
            .and_then(|id| id.trim().parse::<i64>().ok());
        Ok(match (phone, user_id) {
            (Some(phone), Some(user_id)) => Some(Self { user_id, phone }),
            _ => None,
        })
    }

    pub fn save(&self, store: &dyn SessionStore) -> Result<(), SessionError> {
        store.set(PHONE_KEY, &self.phone)?;
        store.set(USER_ID_KEY, &self.user_id.to_string())
    }

    pub fn clear(store: &dyn SessionStore) -> Result<(), SessionError> {
        store.remove(PHONE_KEY)?;
        store.remove(USER_ID_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_requires_both_values() {
        let store = MemorySessionStore::with_values(&[(PHONE_KEY, "+70000000000")]);
        assert_eq!(SavedSession::load(&store).unwrap(), None);

        store.set(USER_ID_KEY, "not-a-number").unwrap();
        assert_eq!(SavedSession::load(&store).unwrap(), None);

        store.set(USER_ID_KEY, "12").unwrap();
        assert_eq!(
            SavedSession::load(&store).unwrap(),
            Some(SavedSession { user_id: 12, phone: "+70000000000".into() })
        );
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(SavedSession::load(&store).unwrap(), None);

        let session = SavedSession { user_id: 3, phone: "+79990001122".into() };
        session.save(&store).unwrap();

        let reopened = FileSessionStore::new(store.path());
        assert_eq!(SavedSession::load(&reopened).unwrap(), Some(session));

        SavedSession::clear(&reopened).unwrap();
        assert_eq!(SavedSession::load(&store).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get(PHONE_KEY), Err(SessionError::Format(_))));
    }
}
