//! Local identity provider and channel-backed navigation
//!
//! The terminal client has no hosted identity service. Sign-in state is a
//! user name kept in the same key-value store as the session clock, so a
//! restart sees the user as still signed in and the stale-session check
//! applies.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use prepper_core::{IdentityProvider, KeyValueStore, Navigator, PrepperError};

/// Store key holding the signed-in user name
pub const IDENTITY_STORAGE_KEY: &str = "signed_in_user";

/// Identity provider backed by the client's key-value store
pub struct LocalIdentity {
    store: Arc<dyn KeyValueStore>,
    fail_revoke: bool,
}

impl LocalIdentity {
    /// Create a provider over `store`
    ///
    /// With `fail_revoke` set, every sign-out reports a revoke failure after
    /// the local credentials are dropped.
    pub fn new(store: Arc<dyn KeyValueStore>, fail_revoke: bool) -> Self {
        Self { store, fail_revoke }
    }

    /// Sign `user` in locally
    pub fn sign_in(&self, user: &str) -> prepper_core::Result<()> {
        info!("Signing in as {}", user);
        self.store.set(IDENTITY_STORAGE_KEY, user)
    }

    /// Currently signed-in user
    pub fn user(&self) -> Option<String> {
        self.store.get(IDENTITY_STORAGE_KEY).ok().flatten()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    async fn sign_out(&self) -> prepper_core::Result<()> {
        self.store.remove(IDENTITY_STORAGE_KEY)?;

        if self.fail_revoke {
            return Err(PrepperError::Provider(
                "token revocation endpoint unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

/// Navigator that forwards routes to the UI task
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    /// Create a navigator and the receiver the UI reads routes from
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            debug!("UI gone, dropping navigation to {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepper_core::MemoryStore;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let store = Arc::new(MemoryStore::new());
        let identity = LocalIdentity::new(store.clone(), false);
        assert!(!identity.is_authenticated());

        identity.sign_in("ada").unwrap();
        assert!(identity.is_authenticated());
        assert_eq!(identity.user().as_deref(), Some("ada"));

        identity.sign_out().await.unwrap();
        assert!(!identity.is_authenticated());
        assert_eq!(store.get(IDENTITY_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_revoke_still_drops_credentials() {
        let identity = LocalIdentity::new(Arc::new(MemoryStore::new()), true);
        identity.sign_in("ada").unwrap();

        let result = identity.sign_out().await;
        assert!(matches!(result, Err(PrepperError::Provider(_))));
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_channel_navigator() {
        let (navigator, mut routes) = ChannelNavigator::new();
        navigator.navigate_to("/");
        assert_eq!(routes.try_recv().unwrap(), "/");

        drop(routes);
        // Receiver gone is not an error
        navigator.navigate_to("/");
    }
}
