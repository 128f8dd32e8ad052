//! Database layer with `SeaORM` entities and store implementations.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the core store contracts
//! - In-memory store implementations for tests and local development
//! - Database migrations

pub mod entities;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use memory::{InMemoryCredentialStore, InMemoryRecordStore};
pub use repositories::{TransactionRepository, UserRepository};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(max_connections);
    Database::connect(options).await
}
