//! Credential store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use fintrack_shared::types::UserId;

use crate::store::StoreError;

/// A persisted user identity.
///
/// The password hash is opaque material; nothing outside the
/// `CredentialVerifier` interprets it.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable, immutable identifier.
    pub id: UserId,
    /// Normalized (trimmed, lowercased) unique email.
    pub email: String,
    /// Opaque password hash material.
    pub password_hash: String,
    /// When the identity was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user identity.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalized email.
    pub email: String,
    /// Opaque password hash material.
    pub password_hash: String,
}

/// Errors from credential store operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The email is already registered (unique constraint).
    #[error("email already registered")]
    DuplicateEmail,

    /// The store could not complete the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable storage for user identities.
///
/// Creation is all-or-nothing: a failed `create` must leave no partial
/// identity record behind.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Finds a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Checks whether an email is already registered.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Creates a new user identity.
    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialError>;
}

/// Normalizes an email for lookup and storage: trim and lowercase.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
