//! External collaborators: identity provider and navigation

use async_trait::async_trait;

use crate::error::Result;

/// Identity provider that issues and revokes the authenticated session
///
/// The provider owns authentication; the session controller only observes
/// it and asks it to revoke on sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Whether the provider currently considers the user signed in
    fn is_authenticated(&self) -> bool;

    /// Revoke the session with the provider
    ///
    /// May fail (network, provider error); callers must not depend on it.
    async fn sign_out(&self) -> Result<()>;
}

/// Navigation facility of the hosting client
pub trait Navigator: Send + Sync {
    /// Move to `path` (e.g. the unauthenticated landing route)
    fn navigate_to(&self, path: &str);
}
