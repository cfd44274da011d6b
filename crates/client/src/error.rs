//! Client error types.

use thiserror::Error;

use quickmailer_core::MAX_KEYS_PER_ACCOUNT;

/// Errors that can occur in the QuickMailer SDK.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection, timeout, bad URL).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success response.
    ///
    /// `message` is the service's own error text, surfaced verbatim.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service, unedited.
        message: String,
    },

    /// The external mail endpoint returned a non-2xx response.
    #[error("email dispatch failed ({status}): {message}")]
    DispatchFailed {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// The account already holds the maximum number of API keys.
    ///
    /// Raised locally, before any network call is made.
    #[error("api key limit reached ({MAX_KEYS_PER_ACCOUNT} keys per account)")]
    KeyLimitReached,

    /// No session token is present; log in first.
    #[error("not logged in")]
    NotAuthenticated,

    /// Reading or writing the session file failed.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The session file or a response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
