//! Router-level tests exercised through `tower::ServiceExt::oneshot`.
//!
//! These use a lazy pool that never connects, so only paths that reject the
//! request before touching the database are covered here: health, missing or
//! invalid credentials, and input validation.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use cartwheel_api::app;
use cartwheel_api::config::ApiConfig;
use cartwheel_api::state::AppState;

fn test_app() -> Router {
    let config = ApiConfig {
        database_url: SecretString::from("postgres://localhost:1/unreachable".to_owned()),
        host: "127.0.0.1".parse().expect("host"),
        port: 0,
        token_secret: SecretString::from("kJ8vN2xQ9mL4pR7wT1yB5cF0hD3gS6aZ".to_owned()),
        email: None,
    };

    // Lazy pool: no connection is attempted until a query runs.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/unreachable")
        .expect("lazy pool");

    app(AppState::new(config, pool).expect("state"))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn json_post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_owned()));
}

#[tokio::test]
async fn test_unknown_route() {
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let request = Request::builder()
        .uri("/carts/get-cart")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing bearer token");
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let request = Request::builder()
        .uri("/orders/my-orders")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid or expired token");
}

#[tokio::test]
async fn test_register_missing_field() {
    let request = json_post(
        "/users/register",
        &json!({
            "firstName": "",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "hunter2hunter2",
            "mobileNo": "0123456789",
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("firstName"));
}

#[tokio::test]
async fn test_register_invalid_email() {
    let request = json_post(
        "/users/register",
        &json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "not-an-email",
            "password": "hunter2hunter2",
            "mobileNo": "0123456789",
        }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_short_password() {
    let request = json_post(
        "/users/register",
        &json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "short",
            "mobileNo": "0123456789",
        }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_invalid_mobile_number() {
    let request = json_post(
        "/users/register",
        &json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "password": "hunter2hunter2",
            "mobileNo": "not-digits",
        }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_malformed_email() {
    let request = json_post(
        "/users/login",
        &json!({ "email": "missing-at-sign", "password": "whatever1" }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_by_price_inverted_range() {
    let request = json_post(
        "/products/search-by-price",
        &json!({ "minPrice": 50, "maxPrice": 10 }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "minPrice must not exceed maxPrice");
}

#[tokio::test]
async fn test_search_by_price_negative_bound() {
    let request = json_post(
        "/products/search-by-price",
        &json!({ "minPrice": -1, "maxPrice": 10 }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
