//! Sign-in providers and session management.
//!
//! Each identity backend implements [`AuthProvider`]. The
//! [`AuthSessionManager`] holds the registered providers, restores a session
//! at startup and routes sign-in/sign-out to the provider that owns it.

pub mod apple;
pub mod manager;
pub mod store;

use async_trait::async_trait;

use crate::error::Result;

pub use apple::{AppleIdCredential, AppleIdProvider, AuthorizationFlow, FlowError, Scope};
pub use manager::{AuthSessionManager, AuthState};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// The signed-in identity for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Stable identifier issued by the provider.
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Provider that issued this session; sign-out is routed here.
    pub provider_id: String,
}

/// One pluggable identity backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Stable identifier used for lookup, e.g. `"apple"`.
    fn id(&self) -> &str;

    /// Human-readable provider name.
    fn display_name(&self) -> &str;

    /// Icon reference for presentation layers.
    fn icon(&self) -> &str;

    /// Whether sign-in can be attempted in this environment.
    fn is_available(&self) -> bool;

    /// The persisted session, if any.
    fn current_session(&self) -> Option<AuthSession>;

    /// Run the interactive sign-in flow.
    async fn sign_in(&self) -> Result<AuthSession>;

    /// Forget the persisted session.
    async fn sign_out(&self) -> Result<()>;
}
