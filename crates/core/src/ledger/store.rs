//! Record store contract.

use async_trait::async_trait;

use fintrack_shared::types::{TransactionId, UserId};

use super::types::{Transaction, TransactionChanges};
use crate::store::StoreError;

/// Durable storage for transaction records.
///
/// Ownership enforcement happens at the query level: every keyed operation
/// filters by owner id inside the store, so a foreign record is never even
/// loaded into memory. Mutations are atomic at single-record granularity.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a fully-populated record.
    async fn insert(&self, record: Transaction) -> Result<(), StoreError>;

    /// Returns every record owned by `owner`, in stable order.
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Transaction>, StoreError>;

    /// Finds a record by id, scoped to `owner`.
    ///
    /// Returns `None` both when the id does not exist and when it belongs
    /// to a different owner.
    async fn find(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Applies changes to the record matching id + stored owner.
    ///
    /// Returns `true` if a record was changed, `false` if no owned record
    /// matched. The stored owner id is never modified.
    async fn apply(&self, owner: UserId, changes: &TransactionChanges) -> Result<bool, StoreError>;

    /// Removes the record matching id + stored owner.
    ///
    /// Returns `true` if a record was removed.
    async fn remove(&self, id: TransactionId, owner: UserId) -> Result<bool, StoreError>;
}
