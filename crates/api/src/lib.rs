//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - The cookie-backed session carrier
//! - Outcome-to-HTTP translation

pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use fintrack_core::auth::CredentialStore;
use fintrack_core::ledger::RecordStore;
use fintrack_shared::JwtService;

/// Application state shared across handlers.
///
/// Stores are trait objects passed in at construction; handlers never see a
/// concrete database type.
#[derive(Clone)]
pub struct AppState {
    /// User identity storage.
    pub credentials: Arc<dyn CredentialStore>,
    /// Transaction record storage.
    pub records: Arc<dyn RecordStore>,
    /// Session token service.
    pub jwt: Arc<JwtService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
