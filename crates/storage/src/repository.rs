use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted session credentials for the signed-in user.
///
/// Holds the bearer token plus enough of the profile to greet the user before
/// the first `/auth/me` round trip completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub token: String,
    pub user_name: String,
    pub user_email: String,
    pub saved_at: DateTime<Utc>,
}

/// Repository contract for the saved session.
///
/// At most one credential record exists at a time; saving replaces any
/// previous one.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the saved credentials, if a session was persisted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read. A missing record is
    /// `Ok(None)`, not an error.
    async fn load(&self) -> Result<Option<CredentialRecord>, StorageError>;

    /// Persist credentials, replacing any existing record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError>;

    /// Remove the saved credentials. A no-op when none exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory credential store for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    record: Arc<Mutex<Option<CredentialRecord>>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn build_record() -> CredentialRecord {
        CredentialRecord {
            token: "jwt-token".into(),
            user_name: "Ada".into(),
            user_email: "ada@example.com".into(),
            saved_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_replaces_previous_record() {
        let store = InMemoryCredentialStore::new();
        store.save(&build_record()).await.unwrap();

        let mut other = build_record();
        other.token = "newer".into();
        store.save(&other).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token, "newer");
    }

    #[tokio::test]
    async fn clear_removes_the_record() {
        let store = InMemoryCredentialStore::new();
        store.save(&build_record()).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
