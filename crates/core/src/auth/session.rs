//! Session carrier contract.

use async_trait::async_trait;

use fintrack_shared::types::UserId;

use crate::store::StoreError;

/// The mechanism that remembers, across requests, which user identity is
/// currently authenticated.
///
/// Concrete implementations may use a cookie, a signed token, or a
/// server-side session table; the gateway only asks it to sign a resolved
/// user in or out.
#[async_trait]
pub trait SessionCarrier: Send + Sync {
    /// Establishes an authenticated context for the given user.
    ///
    /// `remember` extends the session lifetime beyond the current session.
    async fn sign_in(&self, user_id: UserId, remember: bool) -> Result<(), StoreError>;

    /// Tears down the current authenticated context.
    ///
    /// Idempotent: signing out with no active session is not an error.
    async fn sign_out(&self) -> Result<(), StoreError>;
}
