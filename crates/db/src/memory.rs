//! In-memory store implementations.
//!
//! Interface-level fakes for the core store contracts, used by tests and
//! local development. A single `RwLock` per collection gives the
//! read-committed visibility the ledger relies on (an `insert` is visible
//! to an immediately following `list_by_owner`).

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use async_trait::async_trait;

use fintrack_core::StoreError;
use fintrack_core::auth::{CredentialError, CredentialStore, NewUser, UserRecord};
use fintrack_core::ledger::{RecordStore, Transaction, TransactionChanges};
use fintrack_shared::types::{TransactionId, UserId};

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialError> {
        let mut users = self.users.write().await;
        // Uniqueness check and insert under one write lock: all-or-nothing,
        // same as the database's unique index.
        if users.values().any(|u| u.email == user.email) {
            return Err(CredentialError::DuplicateEmail);
        }
        let record = UserRecord {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }
}

/// In-memory record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: RwLock<HashMap<TransactionId, Transaction>>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: Transaction) -> Result<(), StoreError> {
        self.rows.write().await.insert(record.id, record);
        Ok(())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Transaction>, StoreError> {
        let mut rows: Vec<Transaction> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id.into_inner()));
        Ok(rows)
    }

    async fn find(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .get(&id)
            .filter(|r| r.owner == owner)
            .cloned())
    }

    async fn apply(&self, owner: UserId, changes: &TransactionChanges) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&changes.id).filter(|r| r.owner == owner) {
            Some(row) => {
                row.account = changes.account;
                row.category = changes.category;
                row.description = changes.description.clone();
                row.amount = changes.amount;
                row.transaction_date = changes.transaction_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: TransactionId, owner: UserId) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        match rows.get(&id).filter(|r| r.owner == owner) {
            Some(_) => {
                rows.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
