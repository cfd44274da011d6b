//! API key issuance command.
//!
//! Operator stand-in for the external key-generation service: mints a
//! `pk_`-prefixed random key and records it through the store layer, which
//! enforces the per-account key bound inside the insert transaction.
//!
//! # Usage
//!
//! ```bash
//! qm-cli keys issue -e user@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `QUICKMAILER_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to `DATABASE_URL`)

use rand::RngCore;

use quickmailer_core::{ApiKey, Email};
use quickmailer_server::db::accounts::AccountRepository;

use super::CommandError;

/// Mint a new API key and record it for the account with `email`.
pub async fn issue(email: &str) -> Result<ApiKey, CommandError> {
    let email =
        Email::parse(email).map_err(|e| CommandError::InvalidEmail(format!("{email}: {e}")))?;

    let pool = super::connect().await?;
    let repo = AccountRepository::new(&pool);

    let account = repo
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CommandError::AccountNotFound(email.to_string()))?;

    let api_key = mint_key();
    repo.append_api_key(account.id, &api_key).await?;

    tracing::info!(email = %email, "API key issued");

    #[allow(clippy::print_stdout)]
    {
        println!("{api_key}");
    }

    Ok(api_key)
}

/// Mint a `pk_`-prefixed key with 128 bits of OS randomness.
fn mint_key() -> ApiKey {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

    // 35 printable ASCII chars, always valid.
    ApiKey::parse(&format!("pk_{hex}")).unwrap_or_else(|_| unreachable!())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_keys_are_prefixed_and_unique() {
        let a = mint_key();
        let b = mint_key();

        assert!(a.as_str().starts_with("pk_"));
        assert_eq!(a.as_str().len(), 3 + 32);
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_minted_keys_are_lowercase_hex() {
        let key = mint_key();
        assert!(
            key.as_str()[3..]
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }
}
