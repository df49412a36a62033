// Sign in with Apple provider.
// Persists the Apple ID fields individually; name and email only arrive on first authorization.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::{HoneyError, Result};

use super::store::KeyValueStore;
use super::{AuthProvider, AuthSession};

pub const PROVIDER_ID: &str = "apple";

mod keys {
    pub const USER_ID: &str = "appleUserID";
    pub const GIVEN_NAME: &str = "appleUserGivenName";
    pub const FAMILY_NAME: &str = "appleUserFamilyName";
    pub const EMAIL: &str = "appleUserEmail";

    pub const ALL: [&str; 4] = [USER_ID, GIVEN_NAME, FAMILY_NAME, EMAIL];
}

/// Data scopes requested from the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    FullName,
    Email,
}

/// Credential returned by a completed authorization.
///
/// Name and email are only populated the first time a user authorizes the
/// app; later authorizations carry just `user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppleIdCredential {
    pub user: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("authorization was cancelled")]
    Cancelled,

    #[error("authorization failed: {0}")]
    Failed(String),

    #[error("unsupported credential type")]
    UnsupportedCredential,
}

/// The externally presented authorization UI.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Whether the flow can be presented at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Present the flow and wait for the user to finish it.
    async fn authorize(&self, scopes: &[Scope]) -> std::result::Result<AppleIdCredential, FlowError>;
}

/// Apple ID provider over a presentation flow and a field store.
pub struct AppleIdProvider<F, S> {
    flow: F,
    store: S,
}

impl<F: AuthorizationFlow, S: KeyValueStore> AppleIdProvider<F, S> {
    pub fn new(flow: F, store: S) -> Self {
        Self { flow, store }
    }

    fn persist(&self, credential: &AppleIdCredential) -> Result<()> {
        // Stored profile fields belong to the previous user.
        if self.store.get(keys::USER_ID).as_deref() != Some(credential.user.as_str()) {
            for key in [keys::GIVEN_NAME, keys::FAMILY_NAME, keys::EMAIL] {
                self.store.remove(key)?;
            }
        }
        self.store.set(keys::USER_ID, &credential.user)?;

        // Never replace stored values with blanks from a repeat authorization.
        let optional = [
            (keys::GIVEN_NAME, &credential.given_name),
            (keys::FAMILY_NAME, &credential.family_name),
            (keys::EMAIL, &credential.email),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                self.store.set(key, value)?;
            }
        }
        Ok(())
    }

    fn provider_error(&self, message: impl Into<String>) -> HoneyError {
        HoneyError::Provider {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl<F: AuthorizationFlow, S: KeyValueStore> AuthProvider for AppleIdProvider<F, S> {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &str {
        "iCloud"
    }

    fn icon(&self) -> &str {
        "applelogo"
    }

    fn is_available(&self) -> bool {
        self.flow.is_available()
    }

    fn current_session(&self) -> Option<AuthSession> {
        let id = self.store.get(keys::USER_ID)?;

        let parts: Vec<String> = [keys::GIVEN_NAME, keys::FAMILY_NAME]
            .into_iter()
            .filter_map(|key| self.store.get(key))
            .filter(|part| !part.is_empty())
            .collect();
        let display_name = (!parts.is_empty()).then(|| parts.join(" "));

        Some(AuthSession {
            id,
            display_name,
            email: self.store.get(keys::EMAIL),
            provider_id: PROVIDER_ID.to_string(),
        })
    }

    async fn sign_in(&self) -> Result<AuthSession> {
        let credential = self
            .flow
            .authorize(&[Scope::FullName, Scope::Email])
            .await
            .map_err(|e| self.provider_error(e.to_string()))?;

        if credential.user.is_empty() {
            return Err(self.provider_error("credential is missing a user identifier"));
        }

        self.persist(&credential)
            .map_err(|e| self.provider_error(format!("could not store credential: {e}")))?;

        tracing::info!(provider = PROVIDER_ID, "signed in");
        self.current_session()
            .ok_or_else(|| self.provider_error("stored credential could not be read back"))
    }

    async fn sign_out(&self) -> Result<()> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        tracing::info!(provider = PROVIDER_ID, "signed out");
        Ok(())
    }
}
