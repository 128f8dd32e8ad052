//! Cookie-backed session carrier.
//!
//! The identity gateway asks the carrier to sign a resolved user in or out;
//! this implementation issues a signed JWT and parks the resulting cookie
//! change for the handler to attach to its response.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use fintrack_core::StoreError;
use fintrack_core::auth::SessionCarrier;
use fintrack_shared::JwtService;
use fintrack_shared::types::UserId;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "fintrack_session";

/// Pending change to the caller's session cookie.
#[derive(Debug, Clone)]
pub enum SessionChange {
    /// A session token was issued for a signed-in user.
    SignedIn {
        /// The signed session token.
        token: String,
    },
    /// The session was torn down.
    SignedOut,
}

/// Per-request session carrier that turns gateway sign-in/sign-out calls
/// into a session cookie change.
pub struct CookieSessionCarrier {
    jwt: Arc<JwtService>,
    pending: Mutex<Option<SessionChange>>,
}

impl CookieSessionCarrier {
    /// Creates a carrier for a single request.
    #[must_use]
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self {
            jwt,
            pending: Mutex::new(None),
        }
    }

    /// Takes the pending session change, if any.
    #[must_use]
    pub fn take_change(&self) -> Option<SessionChange> {
        self.pending.lock().map_or(None, |mut p| p.take())
    }

    /// Applies the pending change to a cookie jar.
    #[must_use]
    pub fn apply_to(&self, jar: CookieJar) -> CookieJar {
        match self.take_change() {
            Some(SessionChange::SignedIn { token }) => jar.add(session_cookie(token)),
            Some(SessionChange::SignedOut) => {
                jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
            }
            None => jar,
        }
    }
}

#[async_trait]
impl SessionCarrier for CookieSessionCarrier {
    async fn sign_in(&self, user_id: UserId, remember: bool) -> Result<(), StoreError> {
        let token = self
            .jwt
            .issue_session_token(user_id, remember)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(SessionChange::SignedIn { token });
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(SessionChange::SignedOut);
        }
        Ok(())
    }
}

/// Builds the HttpOnly session cookie. Lifetime enforcement lives in the
/// token's `exp` claim, not the cookie.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
