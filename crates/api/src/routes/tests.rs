//! Route tests against in-memory stores.
//!
//! These exercise the full request pipeline (router, middleware, session
//! cookie) without any network or database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, Response, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
};
use fake::{Fake, faker::internet::en::SafeEmail};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};
use fintrack_db::{InMemoryCredentialStore, InMemoryRecordStore};
use fintrack_shared::JwtService;
use fintrack_shared::jwt::JwtConfig;

fn test_router() -> Router {
    let state = AppState {
        credentials: Arc::new(InMemoryCredentialStore::new()),
        records: Arc::new(InMemoryRecordStore::new()),
        jwt: Arc::new(JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            ..JwtConfig::default()
        })),
    };
    create_router(state)
}

async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extracts the session cookie pair from a login response.
fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn register(router: &Router, email: &str, password: &str) -> Response<Body> {
    send(
        router,
        json_request(
            "POST",
            "/auth/register",
            &json!({
                "email": email,
                "password": password,
                "confirm_password": password,
            }),
        ),
    )
    .await
}

async fn login(router: &Router, email: &str, password: &str) -> Response<Body> {
    send(
        router,
        json_request(
            "POST",
            "/auth/login",
            &json!({
                "email": email,
                "password": password,
                "remember_me": false,
            }),
        ),
    )
    .await
}

/// Registers and logs a user in, returning their session cookie.
async fn sign_up_and_in(router: &Router, email: &str) -> String {
    let response = register(router, email, "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = login(router, email, "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    session_cookie(&response)
}

fn transaction_body(amount: &str, description: &str) -> Value {
    json!({
        "account_id": uuid::Uuid::new_v4(),
        "category_id": uuid::Uuid::new_v4(),
        "description": description,
        "amount": amount,
        "transaction_date": "2026-03-14T12:00:00Z",
    })
}

#[tokio::test]
async fn test_health_check() {
    let router = test_router();
    let response = send(&router, get_request("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fintrack-api");
}

#[tokio::test]
async fn test_forms_render_empty() {
    let router = test_router();

    let response = send(&router, get_request("/auth/register")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["form"], "register");

    let response = send(&router, get_request("/auth/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["form"], "login");
}

#[tokio::test]
async fn test_register_redirects_to_login() {
    let router = test_router();
    let email: String = SafeEmail().fake();

    let response = register(&router, &email, "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/auth/login");
}

#[tokio::test]
async fn test_register_duplicate_email_is_field_error() {
    let router = test_router();

    let response = register(&router, "jane@example.com", "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = register(&router, "jane@example.com", "Password123!").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["errors"]["fields"]["email"].is_string());
}

#[rstest]
#[case::mismatched_passwords("jane@example.com", "Password123!", "Different123!")]
#[case::empty_email("", "Password123!", "Password123!")]
#[case::malformed_email("not-an-email", "Password123!", "Password123!")]
#[case::empty_password("jane@example.com", "", "")]
#[tokio::test]
async fn test_register_rejects_invalid_input(
    #[case] email: &str,
    #[case] password: &str,
    #[case] confirm_password: &str,
) {
    let router = test_router();

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            &json!({
                "email": email,
                "password": password,
                "confirm_password": confirm_password,
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_failures_are_generic() {
    let router = test_router();
    let response = register(&router, "jane@example.com", "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let wrong_password = login(&router, "jane@example.com", "wrong").await;
    let unknown_email = login(&router, "nobody@example.com", "Password123!").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Same generic body for both: no account enumeration.
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_login_sets_session_cookie_and_redirects_to_dashboard() {
    let router = test_router();
    let response = register(&router, "jane@example.com", "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = login(&router, "jane@example.com", "Password123!").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/dashboard");
    assert!(session_cookie(&response).starts_with("fintrack_session="));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let router = test_router();

    // No active session: still a redirect to login.
    let response = send(
        &router,
        Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/auth/login");
}

#[tokio::test]
async fn test_access_denied_state() {
    let router = test_router();
    let response = send(&router, get_request("/auth/denied")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "access_denied");
}

#[tokio::test]
async fn test_protected_routes_require_authentication() {
    let router = test_router();
    let response = send(&router, get_request("/transactions")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_transaction_crud_is_scoped_to_owner() {
    let router = test_router();
    let cookie1 = sign_up_and_in(&router, "user1@example.com").await;
    let cookie2 = sign_up_and_in(&router, "user2@example.com").await;

    // User1 records a transaction.
    let mut request = json_request("POST", "/transactions", &transaction_body("100", "Salary"));
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["amount"], "100");

    // User2 sees an empty ledger and cannot reach user1's record.
    let mut request = get_request("/transactions");
    request.headers_mut().insert(COOKIE, cookie2.parse().unwrap());
    let response = send(&router, request).await;
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);

    let mut request = get_request(&format!("/transactions/{id}"));
    request.headers_mut().insert(COOKIE, cookie2.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A foreign delete is indistinguishable from a missing record.
    let mut request = Request::builder()
        .method("DELETE")
        .uri(format!("/transactions/{id}"))
        .body(Body::empty())
        .unwrap();
    request.headers_mut().insert(COOKIE, cookie2.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The record is still there for its owner.
    let mut request = get_request(&format!("/transactions/{id}"));
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Owner updates it.
    let mut request = json_request(
        "PUT",
        &format!("/transactions/{id}"),
        &transaction_body("100", "March Salary"),
    );
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut request = get_request(&format!("/transactions/{id}"));
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let fetched = body_json(send(&router, request).await).await;
    assert_eq!(fetched["description"], "March Salary");

    // Owner deletes it; a second lookup is absent.
    let mut request = Request::builder()
        .method("DELETE")
        .uri(format!("/transactions/{id}"))
        .body(Body::empty())
        .unwrap();
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let mut request = get_request(&format!("/transactions/{id}"));
    request.headers_mut().insert(COOKIE, cookie1.parse().unwrap());
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
