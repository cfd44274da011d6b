//! Session token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs signed with a process-wide secret. There
//! is no server-side session row, no revocation, and no refresh: a token is
//! valid until its expiry, and logout is purely a client-side deletion.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use quickmailer_core::{AccountId, Email};

/// Token lifetime: 7 days.
pub const TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is expired.
    #[error("token expired")]
    Expired,

    /// The token failed signature or claim validation.
    #[error("invalid token")]
    Invalid,

    /// Token could not be signed.
    #[error("token signing failed")]
    Signing,

    /// System clock is before the Unix epoch.
    #[error("system time error")]
    Clock,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier.
    pub sub: AccountId,
    /// Account email at issuance time.
    pub email: String,
    /// Issued at (Unix timestamp).
    pub iat: u64,
    /// Expiration time (Unix timestamp).
    pub exp: u64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    /// Create a signer from the configured secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for an account, expiring [`TOKEN_TTL_SECS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails, or
    /// `TokenError::Clock` if the system clock is unusable.
    pub fn issue(&self, account_id: AccountId, email: &Email) -> Result<String, TokenError> {
        let now = unix_now()?;
        self.issue_at(account_id, email, now)
    }

    /// Issue a token with an explicit issuance time.
    pub(crate) fn issue_at(
        &self,
        account_id: AccountId,
        email: &Email,
        issued_at: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: account_id,
            email: email.as_str().to_owned(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` for expired tokens and
    /// `TokenError::Invalid` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

/// Current Unix timestamp in seconds.
fn unix_now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SecretString::from(
            "kT9#mW2$xL5!qR8@nP4^vZ7&cF0*bJ3%",
        ))
    }

    fn email() -> Email {
        Email::parse("user@example.com").unwrap()
    }

    #[test]
    fn test_issue_then_verify_roundtrips_claims() {
        let signer = signer();
        let token = signer.issue(AccountId::new(42), &email()).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, AccountId::new(42));
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_expiry_is_seven_days_after_issuance() {
        let signer = signer();
        let token = signer.issue(AccountId::new(1), &email()).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = signer();
        let token = signer.issue(AccountId::new(1), &email()).unwrap();

        let mut tampered = token;
        tampered.pop();
        tampered.push('A');

        assert!(matches!(signer.verify(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = signer().issue(AccountId::new(1), &email()).unwrap();

        let other = TokenSigner::new(&SecretString::from(
            "uE6!hG1@sD4#fA9$jK2%lM7^oB5&wQ0*",
        ));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = signer();
        // Issued far enough in the past that exp is beyond validation leeway.
        let token = signer.issue_at(AccountId::new(1), &email(), 1_000).unwrap();

        assert!(matches!(signer.verify(&token), Err(TokenError::Expired)));
    }
}
