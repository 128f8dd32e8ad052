//! Initial database migration.
//!
//! Creates the two durable collections: user identities (unique email) and
//! transactions (owner-id index for listing and ownership checks).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Emails are stored normalized (trimmed, lowercased); uniqueness is
-- enforced here so identity creation is all-or-nothing even under races.
CREATE UNIQUE INDEX users_email_key ON users (email);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users (id),
    account_id UUID NOT NULL,
    category_id UUID NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    amount NUMERIC(19, 4) NOT NULL,
    transaction_date TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Every keyed lookup filters by owner; the index also serves list-by-owner.
CREATE INDEX transactions_user_id_idx ON transactions (user_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS users;
";
