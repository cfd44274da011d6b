//! CLI command implementations.

pub mod keys;
pub mod migrate;
pub mod send;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Invalid API key.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// No account exists for the given email.
    #[error("No account found for email: {0}")]
    AccountNotFound(String),

    /// Repository-level failure (key limit, conflicts).
    #[error(transparent)]
    Repository(#[from] quickmailer_server::db::RepositoryError),

    /// Mail client failure.
    #[error(transparent)]
    Client(#[from] quickmailer_client::ClientError),
}

/// Connect to the database named by `QUICKMAILER_DATABASE_URL` (falling
/// back to `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("QUICKMAILER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("QUICKMAILER_DATABASE_URL"))?
        .into();

    tracing::info!("Connecting to database...");
    let pool = quickmailer_server::db::create_pool(&database_url).await?;
    Ok(pool)
}
