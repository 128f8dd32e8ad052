//! Transaction ledger service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use fintrack_shared::types::{TransactionId, UserId};

use super::store::RecordStore;
use super::types::{MutationOutcome, NewTransaction, Transaction, TransactionChanges};
use crate::store::StoreError;

/// Owner-scoped create/read/update/delete over transaction records.
///
/// The owner id is a first-class parameter on every operation; it is the
/// identity resolved by the authentication layer, never caller-supplied
/// payload data. No business validation (amount sign, date range) is
/// imposed here; those are policy layers above this core.
pub struct TransactionLedger {
    records: Arc<dyn RecordStore>,
}

impl TransactionLedger {
    /// Creates a ledger over the given record store.
    #[must_use]
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Persists a new transaction owned by `owner`.
    ///
    /// Assigns a unique identifier, and a created-at timestamp when the
    /// input does not carry one.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unavailable.
    pub async fn add(
        &self,
        owner: UserId,
        input: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let record = Transaction {
            id: TransactionId::new(),
            owner,
            account: input.account,
            category: input.category,
            description: input.description,
            amount: input.amount,
            transaction_date: input.transaction_date,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        };

        self.records.insert(record.clone()).await?;
        info!(transaction_id = %record.id, owner = %owner, "Transaction recorded");
        Ok(record)
    }

    /// Returns every transaction owned by `owner`.
    ///
    /// Order is stable but otherwise unspecified; callers needing a
    /// particular ordering apply it above this layer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unavailable.
    pub async fn list_all(&self, owner: UserId) -> Result<Vec<Transaction>, StoreError> {
        self.records.list_by_owner(owner).await
    }

    /// Finds a transaction by id, scoped to `owner`.
    ///
    /// `None` covers both a missing id and a record owned by someone else;
    /// the caller cannot tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unavailable.
    pub async fn get_by_id(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, StoreError> {
        self.records.find(id, owner).await
    }

    /// Applies changes to a transaction owned by `owner`.
    ///
    /// The store matches by id plus the owner recorded at creation; the
    /// stored owner id can never change. An ownership mismatch is a silent
    /// no-op reported as `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unavailable.
    pub async fn update(
        &self,
        owner: UserId,
        changes: &TransactionChanges,
    ) -> Result<MutationOutcome, StoreError> {
        if self.records.apply(owner, changes).await? {
            info!(transaction_id = %changes.id, owner = %owner, "Transaction updated");
            Ok(MutationOutcome::Applied)
        } else {
            Ok(MutationOutcome::NotFound)
        }
    }

    /// Removes a transaction owned by `owner`.
    ///
    /// Same non-disclosure policy as `update`: a foreign or missing id is a
    /// no-op reported as `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store is unavailable.
    pub async fn delete(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<MutationOutcome, StoreError> {
        if self.records.remove(id, owner).await? {
            info!(transaction_id = %id, owner = %owner, "Transaction deleted");
            Ok(MutationOutcome::Applied)
        } else {
            Ok(MutationOutcome::NotFound)
        }
    }
}
