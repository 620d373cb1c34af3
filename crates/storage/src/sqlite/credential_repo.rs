use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{CredentialRecord, CredentialRepository, StorageError};

use super::SqliteStore;

#[async_trait]
impl CredentialRepository for SqliteStore {
    async fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT token, user_name, user_email, saved_at
            FROM credentials
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let token: String = row
            .try_get("token")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let user_name: String = row
            .try_get("user_name")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let user_email: String = row
            .try_get("user_email")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let saved_at: DateTime<Utc> = row
            .try_get("saved_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(Some(CredentialRecord {
            token,
            user_name,
            user_email,
            saved_at,
        }))
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO credentials (id, token, user_name, user_email, saved_at)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                token = excluded.token,
                user_name = excluded.user_name,
                user_email = excluded.user_email,
                saved_at = excluded.saved_at
            ",
        )
        .bind(&record.token)
        .bind(&record.user_name)
        .bind(&record.user_email)
        .bind(record.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
