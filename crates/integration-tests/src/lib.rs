//! Integration tests for QuickMailer.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! docker compose up -d postgres
//! cargo run -p quickmailer-cli -- migrate
//!
//! # Start the API server
//! cargo run -p quickmailer-server
//!
//! # Run the ignored end-to-end tests
//! cargo test -p quickmailer-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `QUICKMAILER_BASE_URL` - API server base URL
//!   (default `http://localhost:3000`)
//! - `QUICKMAILER_DATABASE_URL` - `PostgreSQL` connection string, used by
//!   the store-level tests
//!
//! # Test Categories
//!
//! - `auth_flow` - register/login/me against a running server
//! - `api_keys` - key bound enforcement against a running database

/// Base URL for the API server (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("QUICKMAILER_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A unique email address for this test run.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}
