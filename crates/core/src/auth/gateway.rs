//! Identity gateway: registration, login, logout, and access-denial
//! signaling.
//!
//! Validation failures are values (`Outcome`), never errors; the only error
//! the gateway propagates is store unavailability.

use std::collections::BTreeMap;
use std::sync::Arc;

use garde::Validate;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use super::password::{CredentialVerifier, PasswordError};
use super::session::SessionCarrier;
use super::store::{CredentialError, CredentialStore, NewUser, normalize_email};
use crate::store::StoreError;

/// Generic message for any login failure, regardless of cause.
///
/// Unknown email and wrong password must be indistinguishable to avoid
/// account enumeration.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Where the caller should be sent next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The login form.
    Login,
    /// The authenticated user's dashboard.
    Dashboard,
}

/// A view the caller should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The registration form, with any field errors to display.
    Register(FormErrors),
    /// The login form, with any errors to display.
    Login(FormErrors),
    /// Fixed "not authorized" terminal state.
    AccessDenied,
}

/// The gateway's result describing what the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Render a view (typically a form being redisplayed with errors).
    Show(View),
    /// Redirect to a named destination.
    Redirect(Destination),
}

/// Field-level and form-level errors for redisplaying a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    /// Field name to message.
    pub fields: BTreeMap<String, String>,
    /// Message not tied to a single field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general: Option<String>,
}

impl FormErrors {
    /// Creates an empty error set (a pristine form).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_none()
    }

    /// Records an error against a field.
    pub fn add_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.insert(field.into(), message.into());
    }

    /// Builds an error set with only a general message.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            general: Some(message.into()),
        }
    }
}

/// Registration form submission.
#[derive(Debug, Clone, Validate)]
pub struct RegisterInput {
    /// Candidate email address.
    #[garde(length(min = 1), email)]
    pub email: String,
    /// Candidate password.
    #[garde(length(min = 1))]
    pub password: String,
    /// Confirmation, must match `password`.
    #[garde(length(min = 1))]
    pub confirm_password: String,
}

/// Login form submission.
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Extend the session beyond the current browser session.
    pub remember_me: bool,
}

/// Fatal gateway errors; everything recoverable is an `Outcome`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A backing store was unavailable.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing or verification failed unexpectedly.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Orchestrates the account-authentication lifecycle.
///
/// Collaborators are passed in at construction; the gateway holds no
/// ambient or global state.
pub struct IdentityGateway {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionCarrier>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl IdentityGateway {
    /// Creates a gateway over the given collaborators.
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionCarrier>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            verifier,
        }
    }

    /// Returns the empty registration form state. No side effects.
    #[must_use]
    pub fn begin_registration(&self) -> Outcome {
        Outcome::Show(View::Register(FormErrors::new()))
    }

    /// Registers a new user identity.
    ///
    /// On success the caller is redirected to the login form; registration
    /// never authenticates by itself. Any validation failure redisplays the
    /// form with field-level errors and creates no identity record.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` only for store unavailability or a hashing
    /// failure.
    pub async fn register(&self, input: RegisterInput) -> Result<Outcome, GatewayError> {
        let mut errors = FormErrors::new();

        if let Err(report) = input.validate() {
            for (path, problem) in report.iter() {
                errors.add_field(path.to_string(), problem.to_string());
            }
        }

        if !input.password.is_empty()
            && !input.confirm_password.is_empty()
            && input.password != input.confirm_password
        {
            errors.add_field("confirm_password", "Passwords do not match");
        }

        if !errors.is_empty() {
            return Ok(Outcome::Show(View::Register(errors)));
        }

        let email = normalize_email(&input.email);

        if self.credentials.email_exists(&email).await? {
            errors.add_field("email", "An account with this email already exists");
            return Ok(Outcome::Show(View::Register(errors)));
        }

        let password_hash = self.verifier.hash(&input.password)?;

        match self
            .credentials
            .create(NewUser {
                email: email.clone(),
                password_hash,
            })
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, email = %user.email, "New user registered");
                Ok(Outcome::Redirect(Destination::Login))
            }
            // Lost a race against a concurrent registration with the same
            // email; surfaced the same way as the pre-check.
            Err(CredentialError::DuplicateEmail) => {
                errors.add_field("email", "An account with this email already exists");
                Ok(Outcome::Show(View::Register(errors)))
            }
            Err(CredentialError::Store(e)) => {
                error!(error = %e, "Credential store error during registration");
                Err(e.into())
            }
        }
    }

    /// Returns the empty login form state. No side effects.
    #[must_use]
    pub fn begin_login(&self) -> Outcome {
        Outcome::Show(View::Login(FormErrors::new()))
    }

    /// Authenticates a user and establishes a session.
    ///
    /// All failures (missing fields, unknown email, wrong password) produce
    /// the same generic message; missing fields short-circuit before any
    /// credential verification.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` only for store unavailability or an
    /// unexpected verification failure.
    pub async fn login(&self, input: LoginInput) -> Result<Outcome, GatewayError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Ok(Outcome::Show(View::Login(FormErrors::general(
                INVALID_CREDENTIALS,
            ))));
        }

        let email = normalize_email(&input.email);

        let Some(user) = self.credentials.find_by_email(&email).await? else {
            info!(email = %email, "Login attempt for non-existent user");
            return Ok(Outcome::Show(View::Login(FormErrors::general(
                INVALID_CREDENTIALS,
            ))));
        };

        if !self.verifier.verify(&input.password, &user.password_hash)? {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return Ok(Outcome::Show(View::Login(FormErrors::general(
                INVALID_CREDENTIALS,
            ))));
        }

        self.sessions.sign_in(user.id, input.remember_me).await?;

        info!(user_id = %user.id, "User logged in successfully");
        Ok(Outcome::Redirect(Destination::Dashboard))
    }

    /// Tears down the current session and redirects to login.
    ///
    /// Idempotent: logging out with no active session is not an error.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` only if the session carrier is unavailable.
    pub async fn logout(&self) -> Result<Outcome, GatewayError> {
        self.sessions.sign_out().await?;
        Ok(Outcome::Redirect(Destination::Login))
    }

    /// Returns the fixed "not authorized" view state.
    ///
    /// The surrounding request pipeline decides authorization; this gateway
    /// only renders the terminal state.
    #[must_use]
    pub fn access_denied(&self) -> Outcome {
        Outcome::Show(View::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use fintrack_shared::types::UserId;

    use super::*;
    use crate::auth::store::UserRecord;

    /// In-memory credential store fake.
    #[derive(Default)]
    struct FakeCredentials {
        users: Mutex<Vec<UserRecord>>,
    }

    impl FakeCredentials {
        fn with_user(email: &str, password_hash: &str) -> Self {
            let store = Self::default();
            store.users.lock().unwrap().push(UserRecord {
                id: UserId::new(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            });
            store
        }

        fn count(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CredentialStore for FakeCredentials {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
            Ok(self.find_by_email(email).await?.is_some())
        }

        async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(CredentialError::DuplicateEmail);
            }
            let record = UserRecord {
                id: UserId::new(),
                email: user.email,
                password_hash: user.password_hash,
                created_at: Utc::now(),
            };
            users.push(record.clone());
            Ok(record)
        }
    }

    /// Session carrier fake that records sign-in/sign-out calls.
    #[derive(Default)]
    struct RecordingCarrier {
        signed_in: Mutex<Vec<(UserId, bool)>>,
        sign_outs: AtomicUsize,
    }

    #[async_trait]
    impl SessionCarrier for RecordingCarrier {
        async fn sign_in(&self, user_id: UserId, remember: bool) -> Result<(), StoreError> {
            self.signed_in.lock().unwrap().push((user_id, remember));
            Ok(())
        }

        async fn sign_out(&self) -> Result<(), StoreError> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Cheap deterministic verifier fake.
    struct PlainVerifier;

    impl CredentialVerifier for PlainVerifier {
        fn hash(&self, password: &str) -> Result<String, PasswordError> {
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
            Ok(hash == format!("plain:{password}"))
        }
    }

    fn gateway(
        credentials: Arc<FakeCredentials>,
        carrier: Arc<RecordingCarrier>,
    ) -> IdentityGateway {
        IdentityGateway::new(credentials, carrier, Arc::new(PlainVerifier))
    }

    fn register_input(email: &str, password: &str, confirm: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success_creates_one_identity_and_redirects_to_login() {
        let credentials = Arc::new(FakeCredentials::default());
        let gw = gateway(credentials.clone(), Arc::new(RecordingCarrier::default()));

        let outcome = gw
            .register(register_input("jane@example.com", "Password123!", "Password123!"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Redirect(Destination::Login));
        assert_eq!(credentials.count(), 1);
    }

    #[tokio::test]
    async fn test_register_missing_fields_creates_nothing() {
        let credentials = Arc::new(FakeCredentials::default());
        let gw = gateway(credentials.clone(), Arc::new(RecordingCarrier::default()));

        let outcome = gw.register(register_input("", "", "")).await.unwrap();

        match outcome {
            Outcome::Show(View::Register(errors)) => assert!(!errors.is_empty()),
            other => panic!("expected form redisplay, got {other:?}"),
        }
        assert_eq!(credentials.count(), 0);
    }

    #[tokio::test]
    async fn test_register_password_mismatch_redisplays_form() {
        let credentials = Arc::new(FakeCredentials::default());
        let gw = gateway(credentials.clone(), Arc::new(RecordingCarrier::default()));

        let outcome = gw
            .register(register_input("jane@example.com", "Password123!", "Different!"))
            .await
            .unwrap();

        match outcome {
            Outcome::Show(View::Register(errors)) => {
                assert!(errors.fields.contains_key("confirm_password"));
            }
            other => panic!("expected form redisplay, got {other:?}"),
        }
        assert_eq!(credentials.count(), 0);
    }

    #[tokio::test]
    async fn test_register_malformed_email_redisplays_form() {
        let credentials = Arc::new(FakeCredentials::default());
        let gw = gateway(credentials.clone(), Arc::new(RecordingCarrier::default()));

        let outcome = gw
            .register(register_input("not-an-email", "Password123!", "Password123!"))
            .await
            .unwrap();

        match outcome {
            Outcome::Show(View::Register(errors)) => {
                assert!(errors.fields.contains_key("email"));
            }
            other => panic!("expected form redisplay, got {other:?}"),
        }
        assert_eq!(credentials.count(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_field_error() {
        let credentials = Arc::new(FakeCredentials::with_user("jane@example.com", "plain:x"));
        let gw = gateway(credentials.clone(), Arc::new(RecordingCarrier::default()));

        let outcome = gw
            .register(register_input("Jane@Example.com", "Password123!", "Password123!"))
            .await
            .unwrap();

        match outcome {
            Outcome::Show(View::Register(errors)) => {
                assert!(errors.fields.contains_key("email"));
            }
            other => panic!("expected form redisplay, got {other:?}"),
        }
        assert_eq!(credentials.count(), 1);
    }

    #[tokio::test]
    async fn test_login_success_signs_in_and_redirects_to_dashboard() {
        let credentials = Arc::new(FakeCredentials::with_user(
            "jane@example.com",
            "plain:Password123!",
        ));
        let carrier = Arc::new(RecordingCarrier::default());
        let gw = gateway(credentials, carrier.clone());

        let outcome = gw
            .login(LoginInput {
                email: "jane@example.com".to_string(),
                password: "Password123!".to_string(),
                remember_me: true,
            })
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Redirect(Destination::Dashboard));
        let signed_in = carrier.signed_in.lock().unwrap();
        assert_eq!(signed_in.len(), 1);
        assert!(signed_in[0].1, "remember flag should be forwarded");
    }

    #[tokio::test]
    async fn test_login_missing_fields_short_circuits() {
        // A store whose lookups panic would fail this test if the gateway
        // attempted verification; the fake just records that no sign-in
        // happened.
        let carrier = Arc::new(RecordingCarrier::default());
        let gw = gateway(Arc::new(FakeCredentials::default()), carrier.clone());

        let outcome = gw
            .login(LoginInput {
                email: String::new(),
                password: String::new(),
                remember_me: false,
            })
            .await
            .unwrap();

        match outcome {
            Outcome::Show(View::Login(errors)) => {
                assert_eq!(errors.general.as_deref(), Some(INVALID_CREDENTIALS));
            }
            other => panic!("expected form redisplay, got {other:?}"),
        }
        assert!(carrier.signed_in.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let credentials = Arc::new(FakeCredentials::with_user(
            "jane@example.com",
            "plain:Password123!",
        ));
        let gw = gateway(credentials, Arc::new(RecordingCarrier::default()));

        let unknown_email = gw
            .login(LoginInput {
                email: "nobody@example.com".to_string(),
                password: "Password123!".to_string(),
                remember_me: false,
            })
            .await
            .unwrap();
        let wrong_password = gw
            .login(LoginInput {
                email: "jane@example.com".to_string(),
                password: "wrong".to_string(),
                remember_me: false,
            })
            .await
            .unwrap();

        // Identical outcomes: no account enumeration.
        assert_eq!(unknown_email, wrong_password);
    }

    #[tokio::test]
    async fn test_logout_always_redirects_to_login() {
        let carrier = Arc::new(RecordingCarrier::default());
        let gw = gateway(Arc::new(FakeCredentials::default()), carrier.clone());

        // No active session: still fine, still a redirect.
        let first = gw.logout().await.unwrap();
        let second = gw.logout().await.unwrap();

        assert_eq!(first, Outcome::Redirect(Destination::Login));
        assert_eq!(second, Outcome::Redirect(Destination::Login));
        assert_eq!(carrier.sign_outs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_begin_forms_are_empty() {
        let gw = gateway(
            Arc::new(FakeCredentials::default()),
            Arc::new(RecordingCarrier::default()),
        );

        assert_eq!(
            gw.begin_registration(),
            Outcome::Show(View::Register(FormErrors::new()))
        );
        assert_eq!(
            gw.begin_login(),
            Outcome::Show(View::Login(FormErrors::new()))
        );
        assert_eq!(gw.access_denied(), Outcome::Show(View::AccessDenied));
    }
}
