//! Account models.

use chrono::{DateTime, Utc};
use serde::Serialize;

use quickmailer_core::{AccountId, ApiKey, Email};

/// A registered account.
///
/// The password hash is deliberately not part of this struct; it is only
/// ever surfaced by `AccountRepository::get_with_password_hash` and never
/// serialized into a response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity returned at registration: id and email, nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct AccountIdentity {
    pub id: AccountId,
    pub email: Email,
}

/// The denormalized account view returned at login and from `/auth/me`.
///
/// `api_keys` is the one key representation; the legacy single `apiKey`
/// field is gone.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub id: AccountId,
    pub email: Email,
    pub api_keys: Vec<ApiKey>,
}

impl AccountView {
    /// Assemble a view from an account and its issued keys.
    #[must_use]
    pub fn new(account: Account, api_keys: Vec<ApiKey>) -> Self {
        Self {
            id: account.id,
            email: account.email,
            api_keys,
        }
    }
}

impl From<Account> for AccountIdentity {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
        }
    }
}
