//! API key type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of API keys a single account may hold.
///
/// The credential store enforces this bound inside the key-insert
/// transaction; the client treats its own copy of the bound as a UI-only
/// hint and refuses issuance before making a network call.
pub const MAX_KEYS_PER_ACCOUNT: usize = 5;

/// Errors that can occur when parsing an [`ApiKey`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ApiKeyError {
    /// The input string is empty.
    #[error("api key cannot be empty")]
    Empty,
    /// The input contains whitespace or control characters.
    #[error("api key cannot contain whitespace or control characters")]
    InvalidCharacter,
}

/// An opaque API key credential.
///
/// Keys are minted by the key-generation service and replayed verbatim by
/// the mail-dispatch client in the `x-api-key` header. This type never
/// inspects key structure beyond rejecting strings that cannot travel in an
/// HTTP header.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Parse an `ApiKey` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains whitespace or
    /// control characters.
    pub fn parse(s: &str) -> Result<Self, ApiKeyError> {
        if s.is_empty() {
            return Err(ApiKeyError::Empty);
        }

        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ApiKeyError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ApiKey` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ApiKey {
    type Err = ApiKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ApiKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ApiKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ApiKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_key() {
        let key = ApiKey::parse("pk_d93441bddb15dbb11c22d7b7f0ba44d5").unwrap();
        assert_eq!(key.as_str(), "pk_d93441bddb15dbb11c22d7b7f0ba44d5");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(ApiKey::parse(""), Err(ApiKeyError::Empty)));
    }

    #[test]
    fn test_parse_whitespace() {
        assert!(matches!(
            ApiKey::parse("pk_abc def"),
            Err(ApiKeyError::InvalidCharacter)
        ));
        assert!(matches!(
            ApiKey::parse("pk_abc\n"),
            Err(ApiKeyError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let key = ApiKey::parse("pk_abc123").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"pk_abc123\"");
        let parsed: ApiKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
