//! Database migration command.
//!
//! Migrations are embedded from `crates/server/migrations/` at compile
//! time. The server never runs them at startup; this command is the only
//! way schema changes reach a database.
//!
//! # Usage
//!
//! ```bash
//! qm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `QUICKMAILER_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use super::CommandError;

/// Run the database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
