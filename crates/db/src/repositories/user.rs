//! User repository implementing the credential store contract.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use fintrack_core::StoreError;
use fintrack_core::auth::{CredentialError, CredentialStore, NewUser, UserRecord};
use fintrack_shared::types::UserId;

use crate::entities::users;

/// Credential store backed by the users table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_record(model: users::Model) -> UserRecord {
    UserRecord {
        id: UserId::from_uuid(model.id),
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn store_err(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map(|user| user.map(to_record))
            .map_err(store_err)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(store_err)?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, CredentialError> {
        let now = Utc::now().into();
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            created_at: Set(now),
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(to_record(created)),
            // The unique email index rejected the insert; nothing partial
            // was written.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(CredentialError::DuplicateEmail)
            }
            Err(e) => Err(store_err(e).into()),
        }
    }
}
