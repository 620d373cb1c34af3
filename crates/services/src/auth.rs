//! Sign-in lifecycle: login, registration, session restore and logout.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use quiz_core::Clock;
use quiz_core::model::UserProfile;
use storage::repository::{CredentialRecord, CredentialRepository};

use crate::api_client::ApiClient;
use crate::error::{ApiError, AuthError};

/// Authentication service over the API client and the credential store.
///
/// The client's token slot is the single source of the bearer token at
/// runtime; the store only survives restarts.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    credentials: Arc<dyn CredentialRepository>,
    clock: Clock,
}

impl AuthService {
    #[must_use]
    pub fn new(api: ApiClient, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            api,
            credentials,
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(
        api: ApiClient,
        credentials: Arc<dyn CredentialRepository>,
        clock: Clock,
    ) -> Self {
        Self {
            api,
            credentials,
            clock,
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.api.token_slot().is_set()
    }

    async fn remember(&self, token: &str, user: &UserProfile) -> Result<(), AuthError> {
        self.api.token_slot().set(token);
        self.credentials
            .save(&CredentialRecord {
                token: token.to_owned(),
                user_name: user.name.clone(),
                user_email: user.email.clone(),
                saved_at: self.clock.now(),
            })
            .await?;
        Ok(())
    }

    /// Log in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` when the backend rejects the credentials and
    /// `AuthError::Storage` when the session cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let success = self.api.login(email, password).await?;
        self.remember(&success.token, &success.user).await?;
        info!(user = %success.user.name, "signed in");
        Ok(success.user)
    }

    /// Create an account and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` when registration fails and
    /// `AuthError::Storage` when the session cannot be persisted.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthError> {
        let success = self.api.register(name, email, password).await?;
        self.remember(&success.token, &success.user).await?;
        info!(user = %success.user.name, "registered");
        Ok(success.user)
    }

    /// Restore a persisted session, if one exists and its token still works.
    ///
    /// A stored token that the backend no longer accepts is discarded and
    /// `Ok(None)` is returned so the caller lands on the login screen.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` when the store cannot be read and
    /// `AuthError::Api` for failures other than a rejected token.
    pub async fn restore(&self) -> Result<Option<UserProfile>, AuthError> {
        let Some(record) = self.credentials.load().await? else {
            debug!("no saved session");
            return Ok(None);
        };

        self.api.token_slot().set(record.token.as_str());
        match self.api.current_user().await {
            Ok(user) => {
                info!(user = %user.name, "session restored");
                Ok(Some(user))
            }
            Err(ApiError::Unauthorized) => {
                debug!("saved token rejected, clearing session");
                self.logout().await?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Drop the runtime token and the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` when the store cannot be cleared; the
    /// runtime token is gone regardless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.api.token_slot().clear();
        self.credentials.clear().await?;
        Ok(())
    }
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("clock", &self.clock)
            .field("signed_in", &self.is_signed_in())
            .finish_non_exhaustive()
    }
}
