//! Database operations for the QuickMailer `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `account` - Registered identities (email, password hash)
//! - `account_api_key` - Issued API keys, insertion-ordered, at most
//!   [`quickmailer_core::MAX_KEYS_PER_ACCOUNT`] per account
//!
//! The key-generation service writes `account_api_key` too; this crate is
//! the single owner of the schema and its invariants (email uniqueness and
//! the per-account key bound both live in the store, not in handler-level
//! lookups).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p quickmailer-cli -- migrate
//! ```

pub mod accounts;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use accounts::AccountRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The account already holds the maximum number of API keys.
    #[error("api key limit reached")]
    KeyLimit,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
