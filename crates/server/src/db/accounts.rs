//! Account repository for database operations.
//!
//! Queries use the runtime-checked sqlx API so the workspace builds without
//! a live database; the schema lives in `crates/server/migrations/`.

use sqlx::PgPool;

use quickmailer_core::{AccountId, ApiKey, Email, MAX_KEYS_PER_ACCOUNT};

use super::RepositoryError;
use crate::models::account::Account;

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account with email and password hash.
    ///
    /// The email UNIQUE constraint is the authoritative duplicate check:
    /// two concurrent registrations for the same address cannot both
    /// succeed, regardless of what any prior lookup observed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        sqlx::query_as::<_, Account>(
            r"
            INSERT INTO account (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, created_at, updated_at
            ",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            SELECT id, email, created_at, updated_at
            FROM account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Get an account by its email address (exact match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let account = sqlx::query_as::<_, Account>(
            r"
            SELECT id, email, created_at, updated_at
            FROM account
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Get an account together with its password hash, by email.
    ///
    /// Returns `None` if no account has that email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountWithHash>(
            r"
            SELECT id, email, password_hash, created_at, updated_at
            FROM account
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                Account {
                    id: r.id,
                    email: r.email,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                r.password_hash,
            )
        }))
    }

    /// Get all API keys for an account, in issuance order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_api_keys(&self, id: AccountId) -> Result<Vec<ApiKey>, RepositoryError> {
        let keys = sqlx::query_scalar::<_, ApiKey>(
            r"
            SELECT api_key
            FROM account_api_key
            WHERE account_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(keys)
    }

    /// Append an issued API key to an account.
    ///
    /// The per-account bound is checked inside the transaction while the
    /// account row is locked, so concurrent issuance cannot exceed it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::KeyLimit` if the account already holds
    /// the maximum number of keys.
    /// Returns `RepositoryError::Conflict` if the key value already exists.
    pub async fn append_api_key(
        &self,
        id: AccountId,
        api_key: &ApiKey,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, AccountId>(
            r"
            SELECT id FROM account
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM account_api_key
            WHERE account_id = $1
            ",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if count >= i64::try_from(MAX_KEYS_PER_ACCOUNT).unwrap_or(i64::MAX) {
            return Err(RepositoryError::KeyLimit);
        }

        sqlx::query(
            r"
            INSERT INTO account_api_key (account_id, api_key)
            VALUES ($1, $2)
            ",
        )
        .bind(id)
        .bind(api_key)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("api key already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        tx.commit().await?;

        Ok(())
    }
}

/// Row shape for queries that also fetch the password hash.
#[derive(sqlx::FromRow)]
struct AccountWithHash {
    id: AccountId,
    email: Email,
    password_hash: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}
