//! Authentication routes: registration, login, logout, access denial.
//!
//! Handlers translate the identity gateway's `Outcome` into transport
//! responses: redirects become 303s, redisplayed forms become JSON error
//! bodies.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::error::error_response;
use crate::session::CookieSessionCarrier;
use fintrack_core::auth::{
    Argon2Verifier, Destination, FormErrors, IdentityGateway, LoginInput, Outcome, RegisterInput,
    View,
};
use fintrack_shared::AppError;
use fintrack_shared::auth::{LoginRequest, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", get(show_register).post(submit_register))
        .route("/auth/login", get(show_login).post(submit_login))
        .route("/auth/logout", post(logout))
        .route("/auth/denied", get(access_denied))
}

/// Where a gateway redirect points in this transport.
const fn destination_path(destination: Destination) -> &'static str {
    match destination {
        Destination::Login => "/auth/login",
        Destination::Dashboard => "/dashboard",
    }
}

fn gateway(state: &AppState, carrier: Arc<CookieSessionCarrier>) -> IdentityGateway {
    IdentityGateway::new(state.credentials.clone(), carrier, Arc::new(Argon2Verifier))
}

fn form_state(form: &'static str, errors: &FormErrors) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "form": form, "errors": errors })),
    )
        .into_response()
}

fn internal_error() -> Response {
    error_response(&AppError::Internal(
        "An error occurred processing the request".to_string(),
    ))
}

/// GET /auth/register - Show the empty registration form state.
async fn show_register(State(state): State<AppState>) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    match gateway(&state, carrier).begin_registration() {
        Outcome::Show(View::Register(errors)) => form_state("register", &errors),
        _ => internal_error(),
    }
}

/// POST /auth/register - Register a new user.
async fn submit_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    let gw = gateway(&state, carrier);

    let input = RegisterInput {
        email: payload.email,
        password: payload.password,
        confirm_password: payload.confirm_password,
    };

    match gw.register(input).await {
        Ok(Outcome::Redirect(destination)) => {
            Redirect::to(destination_path(destination)).into_response()
        }
        Ok(Outcome::Show(View::Register(errors))) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "validation_failed",
                "errors": errors
            })),
        )
            .into_response(),
        Ok(_) => internal_error(),
        Err(e) => {
            error!(error = %e, "Registration failed");
            internal_error()
        }
    }
}

/// GET /auth/login - Show the empty login form state.
async fn show_login(State(state): State<AppState>) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    match gateway(&state, carrier).begin_login() {
        Outcome::Show(View::Login(errors)) => form_state("login", &errors),
        _ => internal_error(),
    }
}

/// POST /auth/login - Authenticate and establish a session.
async fn submit_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    let gw = gateway(&state, carrier.clone());

    let input = LoginInput {
        email: payload.email,
        password: payload.password,
        remember_me: payload.remember_me,
    };

    match gw.login(input).await {
        Ok(Outcome::Redirect(destination)) => {
            let jar = carrier.apply_to(jar);
            (jar, Redirect::to(destination_path(destination))).into_response()
        }
        Ok(Outcome::Show(View::Login(errors))) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_credentials",
                "message": errors.general.clone(),
                "errors": errors
            })),
        )
            .into_response(),
        Ok(_) => internal_error(),
        Err(e) => {
            error!(error = %e, "Login failed");
            internal_error()
        }
    }
}

/// POST /auth/logout - Tear down the current session.
///
/// Idempotent: succeeds whether or not a session was active.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    let gw = gateway(&state, carrier.clone());

    match gw.logout().await {
        Ok(Outcome::Redirect(destination)) => {
            let jar = carrier.apply_to(jar);
            (jar, Redirect::to(destination_path(destination))).into_response()
        }
        Ok(_) => internal_error(),
        Err(e) => {
            error!(error = %e, "Logout failed");
            internal_error()
        }
    }
}

/// GET /auth/denied - Fixed "not authorized" terminal state.
async fn access_denied(State(state): State<AppState>) -> Response {
    let carrier = Arc::new(CookieSessionCarrier::new(state.jwt.clone()));
    match gateway(&state, carrier).access_denied() {
        Outcome::Show(View::AccessDenied) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "access_denied",
                "message": "You are not authorized to view this resource"
            })),
        )
            .into_response(),
        _ => internal_error(),
    }
}
