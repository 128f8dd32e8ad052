//! Core business logic for Fintrack.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and store contracts live here.
//!
//! # Modules
//!
//! - `auth` - Identity gateway: registration, login, logout, access denial
//! - `ledger` - Owner-scoped transaction records
//! - `store` - Shared store error type

pub mod auth;
pub mod ledger;
pub mod store;

pub use store::StoreError;
