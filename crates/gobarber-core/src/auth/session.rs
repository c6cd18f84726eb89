use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::User;
use crate::storage::{self, Storage};

/// Storage key holding the bearer token, stored verbatim
pub const TOKEN_KEY: &str = "@Gobarber:token";

/// Storage key holding the JSON-serialized user
pub const USER_KEY: &str = "@Gobarber:user";

/// An authenticated session. User and token always travel together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user: User,
    pub token: String,
}

/// Session state mirrored between memory and persistent storage.
pub struct Session {
    storage: Arc<dyn Storage>,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            data: None,
        }
    }

    /// Restore the session from storage.
    ///
    /// Both keys must be present and the user must parse; anything else
    /// leaves the session unauthenticated.
    pub fn load(&mut self) -> bool {
        self.data = self.read_persisted();
        self.data.is_some()
    }

    fn read_persisted(&self) -> Option<SessionData> {
        let token = self.read_key(TOKEN_KEY)?;
        let raw_user = self.read_key(USER_KEY)?;

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => {
                debug!(user_id = %user.id, "Restored session from storage");
                Some(SessionData { user, token })
            }
            Err(e) => {
                warn!(error = %e, "Stored user is malformed, starting signed out");
                None
            }
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read session key");
                None
            }
        }
    }

    /// Persist `data` under both keys
    ///
    /// If the user cannot be written the token key is put back the way it
    /// was, so storage never pairs a new token with an old user.
    pub fn save(&self, data: &SessionData) -> storage::Result<()> {
        let json = serde_json::to_string(&data.user)?;
        let previous_token = self.read_key(TOKEN_KEY);

        self.storage.set(TOKEN_KEY, &data.token)?;
        if let Err(e) = self.storage.set(USER_KEY, &json) {
            let rollback = match previous_token {
                Some(ref token) => self.storage.set(TOKEN_KEY, token),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(rollback_err) = rollback {
                warn!(error = %rollback_err, "Failed to roll back session token");
            }
            return Err(e);
        }
        Ok(())
    }

    fn write_user(&self, user: &User) -> storage::Result<()> {
        let json = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &json)
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Replace the stored user, keeping the token.
    /// Returns `Ok(false)` without touching storage when signed out.
    pub fn update_user(&mut self, user: User) -> storage::Result<bool> {
        if self.data.is_none() {
            return Ok(false);
        }
        self.write_user(&user)?;
        if let Some(data) = self.data.as_mut() {
            data.user = user;
        }
        Ok(true)
    }

    /// Remove both keys and forget the in-memory session.
    /// Removal failures are logged; memory is cleared regardless.
    pub fn clear(&mut self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = key, error = %e, "Failed to remove session key");
            }
        }
        self.data = None;
    }

    /// Get the bearer token if signed in
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.data.as_ref().map(|d| &d.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn stored(token: Option<&str>, user: Option<&str>) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(token) = token {
            storage.set(TOKEN_KEY, token).unwrap();
        }
        if let Some(user) = user {
            storage.set(USER_KEY, user).unwrap();
        }
        storage
    }

    #[test]
    fn test_load_restores_session() {
        let storage = stored(
            Some("T"),
            Some(r#"{"id":"u1","name":"N","email":"e@x.com"}"#),
        );
        let mut session = Session::new(storage);

        assert!(session.load());
        assert_eq!(session.token(), Some("T"));
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("e@x.com"));
    }

    #[test]
    fn test_load_empty_storage() {
        let mut session = Session::new(stored(None, None));
        assert!(!session.load());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_load_requires_both_keys() {
        let mut session = Session::new(stored(Some("T"), None));
        assert!(!session.load());

        let mut session = Session::new(stored(
            None,
            Some(r#"{"id":"u1","name":"N","email":"e@x.com"}"#),
        ));
        assert!(!session.load());
    }

    #[test]
    fn test_load_malformed_user() {
        let mut session = Session::new(stored(Some("T"), Some("{not json")));
        assert!(!session.load());
        assert!(session.token().is_none());

        // Valid JSON, wrong shape
        let mut session = Session::new(stored(Some("T"), Some(r#"{"id":"u1"}"#)));
        assert!(!session.load());
    }

    /// Accepts everything except writes to the user key
    #[derive(Default)]
    struct UserWriteFails(MemoryStorage);

    impl Storage for UserWriteFails {
        fn get(&self, key: &str) -> storage::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> storage::Result<()> {
            if key == USER_KEY {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> storage::Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_save_removes_token_when_user_write_fails() {
        let storage = Arc::new(UserWriteFails::default());
        let session = Session::new(storage.clone());
        let data = SessionData {
            user: User {
                id: "u1".to_string(),
                name: "N".to_string(),
                email: "e@x.com".to_string(),
                avatar_url: None,
            },
            token: "T".to_string(),
        };

        assert!(session.save(&data).is_err());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(storage.0.is_empty());
    }

    #[test]
    fn test_update_user_when_signed_out_writes_nothing() {
        let storage = stored(None, None);
        let mut session = Session::new(storage.clone());
        let user = User {
            id: "u1".to_string(),
            name: "N".to_string(),
            email: "e@x.com".to_string(),
            avatar_url: None,
        };

        assert!(!session.update_user(user).unwrap());
        assert!(storage.is_empty());
    }
}
