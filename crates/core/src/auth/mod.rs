//! Identity gateway and its capability contracts.
//!
//! This module provides:
//! - Password hashing with Argon2id and the `CredentialVerifier` contract
//! - The `CredentialStore` and `SessionCarrier` contracts
//! - The `IdentityGateway` orchestrating registration, login, and logout

mod gateway;
mod password;
mod session;
mod store;

pub use gateway::{
    Destination, FormErrors, GatewayError, IdentityGateway, LoginInput, Outcome, RegisterInput,
    View,
};
pub use password::{Argon2Verifier, CredentialVerifier, PasswordError, hash_password, verify_password};
pub use session::SessionCarrier;
pub use store::{CredentialError, CredentialStore, NewUser, UserRecord, normalize_email};
