//! Repository implementations of the core store contracts.
//!
//! Repositories hide the `SeaORM` implementation details from the rest of
//! the application; the gateway and ledger only ever see the traits.

pub mod transaction;
pub mod user;

pub use transaction::TransactionRepository;
pub use user::UserRepository;
