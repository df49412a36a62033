// Session manager across sign-in providers.
// Restores the first persisted session and publishes session, progress and error changes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{HoneyError, Result};

use super::{AuthProvider, AuthSession};

/// Observable authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<AuthSession>,
    pub signing_in: bool,
    pub error: Option<String>,
}

/// Routes sign-in and sign-out to registered providers.
///
/// At most one session is active at a time. Calls are expected to come from
/// a single task; the manager does not serialize overlapping operations.
pub struct AuthSessionManager {
    providers: Vec<Arc<dyn AuthProvider>>,
    by_id: HashMap<String, usize>,
    state: watch::Sender<AuthState>,
}

impl AuthSessionManager {
    /// Register providers in order and restore the first persisted session.
    ///
    /// When two providers share an id the later one handles lookups, but
    /// session restore still walks the list in registration order.
    pub fn new(providers: Vec<Arc<dyn AuthProvider>>) -> Self {
        let by_id = providers
            .iter()
            .enumerate()
            .map(|(index, provider)| (provider.id().to_string(), index))
            .collect();

        let session = providers.iter().find_map(|p| p.current_session());
        if let Some(session) = &session {
            tracing::debug!(provider = %session.provider_id, "restored session");
        }

        let (state, _) = watch::channel(AuthState {
            session,
            ..AuthState::default()
        });

        Self {
            providers,
            by_id,
            state,
        }
    }

    /// Providers in registration order.
    pub fn providers(&self) -> &[Arc<dyn AuthProvider>] {
        &self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&Arc<dyn AuthProvider>> {
        self.by_id.get(id).map(|&index| &self.providers[index])
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.state.borrow().session.clone()
    }

    /// Snapshot of the published state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receive every subsequent state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Sign in with the provider registered under `provider_id`.
    ///
    /// On success the new session replaces any existing one, whichever
    /// provider issued it. On failure the existing session is kept.
    pub async fn sign_in(&self, provider_id: &str) -> Result<AuthSession> {
        let provider = self
            .provider(provider_id)
            .cloned()
            .ok_or_else(|| HoneyError::UnknownProvider(provider_id.to_string()))?;

        self.state.send_modify(|state| {
            state.signing_in = true;
            state.error = None;
        });

        let outcome = provider.sign_in().await;

        self.state.send_modify(|state| {
            state.signing_in = false;
            match &outcome {
                Ok(session) => state.session = Some(session.clone()),
                Err(e) => state.error = Some(e.to_string()),
            }
        });

        if let Err(e) = &outcome {
            tracing::warn!(provider = provider_id, error = %e, "sign-in failed");
        }
        outcome
    }

    /// Sign out of the active session. Does nothing when signed out.
    ///
    /// A session whose provider is no longer registered is dropped as if
    /// already signed out.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        match self.provider(&session.provider_id).cloned() {
            Some(provider) => {
                if let Err(e) = provider.sign_out().await {
                    tracing::warn!(provider = %session.provider_id, error = %e, "sign-out failed");
                    self.state.send_modify(|state| state.error = Some(e.to_string()));
                    return Err(e);
                }
            }
            None => {
                tracing::warn!(
                    provider = %session.provider_id,
                    "session provider not registered; treating as signed out"
                );
            }
        }

        self.state.send_modify(|state| {
            state.session = None;
            state.error = None;
        });
        Ok(())
    }
}
