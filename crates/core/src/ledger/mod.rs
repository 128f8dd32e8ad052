//! Owner-scoped transaction ledger.
//!
//! Every operation is parameterized by the caller's resolved user
//! identifier; a record is only ever visible to or mutable by its owner.

mod service;
mod store;
mod types;

pub use service::TransactionLedger;
pub use store::RecordStore;
pub use types::{MutationOutcome, NewTransaction, Transaction, TransactionChanges};
