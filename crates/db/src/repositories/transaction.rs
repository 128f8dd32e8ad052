//! Transaction repository implementing the record store contract.
//!
//! Ownership is enforced inside every query: keyed operations filter by
//! owner id in SQL, so a foreign record is never loaded into memory.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use fintrack_core::StoreError;
use fintrack_core::ledger::{RecordStore, Transaction, TransactionChanges};
use fintrack_shared::types::{AccountId, CategoryId, TransactionId, UserId};

use crate::entities::transactions;

/// Record store backed by the transactions table.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_record(model: transactions::Model) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(model.id),
        owner: UserId::from_uuid(model.user_id),
        account: AccountId::from_uuid(model.account_id),
        category: CategoryId::from_uuid(model.category_id),
        description: model.description,
        amount: model.amount,
        transaction_date: model.transaction_date.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn store_err(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl RecordStore for TransactionRepository {
    async fn insert(&self, record: Transaction) -> Result<(), StoreError> {
        let model = transactions::ActiveModel {
            id: Set(record.id.into_inner()),
            user_id: Set(record.owner.into_inner()),
            account_id: Set(record.account.into_inner()),
            category_id: Set(record.category.into_inner()),
            description: Set(record.description),
            amount: Set(record.amount),
            transaction_date: Set(record.transaction_date.into()),
            created_at: Set(record.created_at.into()),
        };

        model.insert(&self.db).await.map_err(store_err)?;
        Ok(())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Transaction>, StoreError> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map(|rows| rows.into_iter().map(to_record).collect())
            .map_err(store_err)
    }

    async fn find(
        &self,
        id: TransactionId,
        owner: UserId,
    ) -> Result<Option<Transaction>, StoreError> {
        transactions::Entity::find_by_id(id.into_inner())
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await
            .map(|row| row.map(to_record))
            .map_err(store_err)
    }

    async fn apply(&self, owner: UserId, changes: &TransactionChanges) -> Result<bool, StoreError> {
        // Matched by id + stored owner; the user_id column is never part of
        // the SET list, so ownership cannot be reassigned.
        let result = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::AccountId,
                Expr::value(changes.account.into_inner()),
            )
            .col_expr(
                transactions::Column::CategoryId,
                Expr::value(changes.category.into_inner()),
            )
            .col_expr(
                transactions::Column::Description,
                Expr::value(changes.description.clone()),
            )
            .col_expr(transactions::Column::Amount, Expr::value(changes.amount))
            .col_expr(
                transactions::Column::TransactionDate,
                Expr::value(changes.transaction_date),
            )
            .filter(transactions::Column::Id.eq(changes.id.into_inner()))
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn remove(&self, id: TransactionId, owner: UserId) -> Result<bool, StoreError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;

        Ok(result.rows_affected > 0)
    }
}
