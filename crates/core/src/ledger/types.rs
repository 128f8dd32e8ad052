//! Transaction record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fintrack_shared::types::{AccountId, CategoryId, TransactionId, UserId};

/// A stored transaction record.
///
/// Sign convention for `amount`: negative = expense, positive = income.
/// The owner is set at creation and never mutated by any ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned unique identifier (unique across all users).
    pub id: TransactionId,
    /// Owning user identifier. Immutable.
    pub owner: UserId,
    /// Account this transaction posts to. Opaque, not validated here.
    pub account: AccountId,
    /// Category of the transaction. Opaque, not validated here.
    pub category: CategoryId,
    /// Free-text description; may be empty.
    pub description: String,
    /// Signed fixed-point amount.
    pub amount: Decimal,
    /// When the transaction occurred (caller-supplied).
    pub transaction_date: DateTime<Utc>,
    /// When the record was inserted (store-assigned). Immutable.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a transaction.
///
/// The identifier and (unless supplied) the created-at timestamp are
/// assigned by the ledger on `add`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    /// Account this transaction posts to.
    pub account: AccountId,
    /// Category of the transaction.
    pub category: CategoryId,
    /// Free-text description; may be empty.
    #[serde(default)]
    pub description: String,
    /// Signed fixed-point amount.
    pub amount: Decimal,
    /// When the transaction occurred.
    pub transaction_date: DateTime<Utc>,
    /// Record-creation time; assigned by the ledger when absent.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Changes to apply to an existing transaction.
///
/// Deliberately carries no owner field: the store matches by id plus the
/// owner recorded at creation, so an update can never reassign ownership.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionChanges {
    /// Identifier of the record to change.
    pub id: TransactionId,
    /// New account reference.
    pub account: AccountId,
    /// New category reference.
    pub category: CategoryId,
    /// New description.
    #[serde(default)]
    pub description: String,
    /// New amount.
    pub amount: Decimal,
    /// New transaction date.
    pub transaction_date: DateTime<Utc>,
}

/// Result of a keyed update or delete.
///
/// `NotFound` covers both a missing id and an ownership mismatch; the two
/// are indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The record existed, was owned by the caller, and was changed.
    Applied,
    /// No owned record with that id; nothing happened.
    NotFound,
}
