//! Session store — the auth token and user record, persisted on device.
//!
//! The store never propagates failures: writes log and continue, reads
//! log and return an absent value. An absent token always means "must
//! re-authenticate"; no caller treats it any other way.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::api::UserProfile;
use crate::error::StoreError;

/// Storage key (file name) for the opaque auth token.
const TOKEN_KEY: &str = "auth_token";
/// Storage key (file name) for the serialized user record.
const USER_KEY: &str = "user_data";

/// Device-local persistent session state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist the token and user record, replacing any prior session.
    async fn save(&self, token: &str, user: &UserProfile);

    /// The saved auth token, if any.
    async fn token(&self) -> Option<String>;

    /// The saved user record, if any.
    async fn user(&self) -> Option<UserProfile>;

    /// Drop the saved session (logout).
    async fn clear(&self);
}

/// File-backed store: two fixed keys as files under the data directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    async fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path(key), contents).await?;
        Ok(())
    }

    async fn write_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(user)?;
        self.write(USER_KEY, &json).await
    }

    async fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path(key)).await {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, "Error reading session store: {e}");
                None
            }
        }
    }

    async fn remove(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.path(key)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key, "Error clearing session store: {e}");
            }
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, token: &str, user: &UserProfile) {
        if let Err(e) = self.write(TOKEN_KEY, token).await {
            tracing::warn!("Error saving auth token: {e}");
        }
        if let Err(e) = self.write_user(user).await {
            tracing::warn!("Error saving user record: {e}");
        }
    }

    async fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).await.filter(|t| !t.is_empty())
    }

    async fn user(&self) -> Option<UserProfile> {
        let json = self.read(USER_KEY).await?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Error decoding stored user record: {e}");
                None
            }
        }
    }

    async fn clear(&self) {
        self.remove(TOKEN_KEY).await;
        self.remove(USER_KEY).await;
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<(String, UserProfile)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, token: &str, user: &UserProfile) {
        *self.session.write().await = Some((token.to_string(), user.clone()));
    }

    async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|(t, _)| t.clone())
    }

    async fn user(&self) -> Option<UserProfile> {
        self.session.read().await.as_ref().map(|(_, u)| u.clone())
    }

    async fn clear(&self) {
        *self.session.write().await = None;
    }
}
