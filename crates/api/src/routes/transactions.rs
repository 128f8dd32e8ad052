//! Transaction management routes.
//!
//! Every handler scopes its ledger call to the identity resolved by the
//! auth middleware. A missing record and a record owned by someone else
//! produce the same 404; no response distinguishes the two.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, error::error_response, middleware::AuthUser};
use fintrack_core::ledger::{
    MutationOutcome, NewTransaction, Transaction, TransactionChanges, TransactionLedger,
};
use fintrack_shared::AppError;
use fintrack_shared::types::{AccountId, CategoryId, TransactionId};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Account the transaction posts to.
    pub account_id: AccountId,
    /// Transaction category.
    pub category_id: CategoryId,
    /// Description; may be empty.
    #[serde(default)]
    pub description: String,
    /// Signed amount (negative = expense, positive = income).
    pub amount: Decimal,
    /// When the transaction occurred.
    pub transaction_date: DateTime<Utc>,
}

/// Request body for updating a transaction.
///
/// Carries no owner field; ownership comes from the session, never the
/// payload.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Account the transaction posts to.
    pub account_id: AccountId,
    /// Transaction category.
    pub category_id: CategoryId,
    /// Description; may be empty.
    #[serde(default)]
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
    /// When the transaction occurred.
    pub transaction_date: DateTime<Utc>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: TransactionId,
    /// Account reference.
    pub account_id: AccountId,
    /// Category reference.
    pub category_id: CategoryId,
    /// Description.
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
    /// When the transaction occurred.
    pub transaction_date: DateTime<Utc>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(record: Transaction) -> Self {
        Self {
            id: record.id,
            account_id: record.account,
            category_id: record.category,
            description: record.description,
            amount: record.amount,
            transaction_date: record.transaction_date,
            created_at: record.created_at,
        }
    }
}

fn ledger(state: &AppState) -> TransactionLedger {
    TransactionLedger::new(state.records.clone())
}

fn not_found() -> Response {
    error_response(&AppError::NotFound("Transaction not found".to_string()))
}

fn internal_error() -> Response {
    error_response(&AppError::Internal(
        "An error occurred processing the request".to_string(),
    ))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transactions - Record a new transaction for the caller.
async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Response {
    let input = NewTransaction {
        account: payload.account_id,
        category: payload.category_id,
        description: payload.description,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
        created_at: None,
    };

    match ledger(&state).add(user.user_id(), input).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(TransactionResponse::from(record)),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to record transaction");
            internal_error()
        }
    }
}

/// GET /transactions - List every transaction owned by the caller.
async fn list_transactions(State(state): State<AppState>, user: AuthUser) -> Response {
    match ledger(&state).list_all(user.user_id()).await {
        Ok(records) => {
            let records: Vec<TransactionResponse> =
                records.into_iter().map(TransactionResponse::from).collect();
            (StatusCode::OK, Json(json!({ "transactions": records }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            internal_error()
        }
    }
}

/// GET /transactions/{id} - Fetch one owned transaction.
async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> Response {
    let id = TransactionId::from_uuid(transaction_id);

    match ledger(&state).get_by_id(id, user.user_id()).await {
        Ok(Some(record)) => (StatusCode::OK, Json(TransactionResponse::from(record))).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch transaction");
            internal_error()
        }
    }
}

/// PUT /transactions/{id} - Update one owned transaction.
async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> Response {
    let changes = TransactionChanges {
        id: TransactionId::from_uuid(transaction_id),
        account: payload.account_id,
        category: payload.category_id,
        description: payload.description,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
    };

    match ledger(&state).update(user.user_id(), &changes).await {
        Ok(MutationOutcome::Applied) => {
            (StatusCode::OK, Json(json!({ "status": "updated" }))).into_response()
        }
        Ok(MutationOutcome::NotFound) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update transaction");
            internal_error()
        }
    }
}

/// DELETE /transactions/{id} - Delete one owned transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> Response {
    let id = TransactionId::from_uuid(transaction_id);

    match ledger(&state).delete(id, user.user_id()).await {
        Ok(MutationOutcome::Applied) => StatusCode::NO_CONTENT.into_response(),
        Ok(MutationOutcome::NotFound) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete transaction");
            internal_error()
        }
    }
}
