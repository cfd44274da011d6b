//! Integration tests for the account API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p quickmailer-server)
//!
//! Run with: cargo test -p quickmailer-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use quickmailer_client::{QuickMailerClient, SessionStore};
use quickmailer_core::Email;
use quickmailer_integration_tests::{base_url, unique_email};

const PASSWORD: &str = "correct-horse-battery";

/// Test helper: register an account, asserting success.
async fn register(client: &Client, email: &str) -> Value {
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse response")
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_register_returns_identity() {
    let client = Client::new();
    let email = unique_email("register");

    let body = register(&client, &email).await;

    assert_eq!(body["message"], "Account created successfully");
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"]["id"].is_i64());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_duplicate_registration_rejected_and_credentials_intact() {
    let client = Client::new();
    let email = unique_email("duplicate");

    register(&client, &email).await;

    // Second registration with a different password must fail.
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": email, "password": "another-password-entirely" }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());

    // The original credentials must be untouched by the failed attempt.
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_register_rejects_short_password() {
    let client = Client::new();

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({ "email": unique_email("weak"), "password": "short" }))
        .send()
        .await
        .expect("Failed to send registration");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_login_returns_token_and_account_view() {
    let client = Client::new();
    let email = unique_email("login");
    register(&client, &email).await;

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"]["api_keys"].is_array());
    assert!(body["user"].get("apiKey").is_none());
}

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_login_failures_are_indistinguishable() {
    let client = Client::new();
    let email = unique_email("enumeration");
    register(&client, &email).await;

    // Wrong password for an existing account.
    let wrong_password = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .expect("Failed to send login");

    // Unknown account entirely.
    let unknown_account = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": unique_email("ghost"), "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_account.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await.expect("Failed to parse");
    let b: Value = unknown_account.json().await.expect("Failed to parse");
    assert_eq!(a, b);
    assert_eq!(a["error"], "Invalid credentials");
}

// ============================================================================
// Account View Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_me_returns_authoritative_account() {
    let client = Client::new();
    let email = unique_email("me");
    register(&client, &email).await;

    let login: Value = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to log in")
        .json()
        .await
        .expect("Failed to parse response");

    let token = login["token"].as_str().expect("token missing");

    let resp = client
        .get(format!("{}/auth/me", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get account view");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_me_rejects_garbage_token() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/auth/me", base_url()))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// SDK Flow Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_sdk_login_logout_roundtrip() {
    let email_raw = unique_email("sdk");
    let email = Email::parse(&email_raw).expect("valid email");

    let api = QuickMailerClient::new(base_url());
    api.register(&email, PASSWORD).await.expect("register");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let mut session = SessionStore::open(&path).expect("open session");
    api.login(&email, PASSWORD, &mut session)
        .await
        .expect("login");

    assert!(session.is_authenticated());
    assert_eq!(
        session.account().expect("account").email.as_str(),
        email_raw
    );

    // Refresh replaces the shadow account with the server's view.
    api.refresh(&mut session).await.expect("refresh");
    assert!(session.is_authenticated());

    session.clear().expect("clear");
    assert!(!session.is_authenticated());
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running QuickMailer server and database"]
async fn test_health_endpoints() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to get /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to get /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}
