//! Persistent session context.
//!
//! The original UI kept its session in two browser-local slots (`token`,
//! `user`) mutated from whichever component happened to touch them.
//! [`SessionStore`] replaces that with one explicit object: a JSON file
//! holding the verbatim session token and a shadow copy of the account.
//!
//! The shadow copy is a cache, not the truth: it is populated at login,
//! appended to on key issuance, and only reconciled with the server when
//! `QuickMailerClient::refresh` is called. No expiry check is performed
//! here; an expired token is replayed until a server call rejects it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use quickmailer_core::{AccountId, ApiKey, Email};

use crate::error::ClientError;

/// Shadow copy of the account held in the session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAccount {
    pub id: AccountId,
    pub email: Email,
    pub api_keys: Vec<ApiKey>,
}

/// On-disk session shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionData {
    token: Option<String>,
    account: Option<SessionAccount>,
}

/// File-backed session store.
///
/// Every mutation is written through to disk immediately, so a session
/// survives process restarts the way browser storage survived page loads.
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    /// Open a session store at `path`, loading existing state if present.
    ///
    /// A missing file is an anonymous session, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the file exists but cannot be
    /// read, or `ClientError::Decode` if it holds malformed JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            SessionData::default()
        };

        Ok(Self { path, data })
    }

    /// Whether a session token is present.
    ///
    /// Presence only: the token may already be expired, and that is only
    /// discovered when a server call rejects it.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.data.token.is_some()
    }

    /// The stored session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    /// The shadow account, if any.
    #[must_use]
    pub const fn account(&self) -> Option<&SessionAccount> {
        self.data.account.as_ref()
    }

    /// Populate the session after a successful login.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the session file cannot be written.
    pub fn set_session(
        &mut self,
        token: String,
        account: SessionAccount,
    ) -> Result<(), ClientError> {
        self.data.token = Some(token);
        self.data.account = Some(account);
        self.save()
    }

    /// Replace the shadow account with an authoritative copy.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the session file cannot be written.
    pub fn replace_account(&mut self, account: SessionAccount) -> Result<(), ClientError> {
        self.data.account = Some(account);
        self.save()
    }

    /// Append a newly issued key to the shadow account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` if no account is cached.
    /// Returns `ClientError::Storage` if the session file cannot be written.
    pub fn append_api_key(&mut self, api_key: ApiKey) -> Result<(), ClientError> {
        let account = self
            .data
            .account
            .as_mut()
            .ok_or(ClientError::NotAuthenticated)?;

        account.api_keys.push(api_key);
        self.save()
    }

    /// Clear the session (logout).
    ///
    /// Client-side only: the token is not invalidated at the server, since
    /// none is tracked there.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the session file cannot be written.
    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.data = SessionData::default();
        self.save()
    }

    /// Write the current state to disk.
    fn save(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
