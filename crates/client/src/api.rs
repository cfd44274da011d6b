//! Account API and key issuance client.
//!
//! Talks to two things: the QuickMailer account API (`/auth/*`) and the
//! external key-generation collaborator (`/generate-key`). Key generation
//! is owned by that service; this client only forwards the bearer token,
//! caches the result, and applies the advisory per-account key bound
//! locally so a capped account never produces a doomed network call.

use reqwest::StatusCode;
use serde::Deserialize;

use quickmailer_core::{AccountId, ApiKey, Email, MAX_KEYS_PER_ACCOUNT};

use crate::error::ClientError;
use crate::session::{SessionAccount, SessionStore};

/// The identity returned by registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredAccount {
    pub id: AccountId,
    pub email: Email,
}

/// Wire shape of `POST /auth/register` responses.
#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[allow(dead_code)]
    message: String,
    user: RegisteredAccount,
}

/// Wire shape of `POST /auth/login` and `GET /auth/me` account payloads.
#[derive(Debug, Deserialize)]
struct AccountPayload {
    id: AccountId,
    email: Email,
    api_keys: Vec<ApiKey>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: AccountPayload,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: AccountPayload,
}

/// Wire shape of the key-generation collaborator's response.
#[derive(Debug, Deserialize)]
struct GenerateKeyResponse {
    #[serde(rename = "apiKey")]
    api_key: ApiKey,
}

/// Error body shape shared by the account API and the collaborator.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl From<AccountPayload> for SessionAccount {
    fn from(payload: AccountPayload) -> Self {
        Self {
            id: payload.id,
            email: payload.email,
            api_keys: payload.api_keys,
        }
    }
}

/// Client for the QuickMailer account API and the key-generation service.
#[derive(Clone)]
pub struct QuickMailerClient {
    http: reqwest::Client,
    api_base: String,
}

impl QuickMailerClient {
    /// Create a new client for the given API base URL.
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_owned();

        Self {
            http: reqwest::Client::new(),
            api_base,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the service's message on rejection
    /// (duplicate email, weak password) and `ClientError::Http` on
    /// transport failure.
    pub async fn register(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<RegisteredAccount, ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/register", self.api_base))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: RegisterResponse = response.json().await?;
        Ok(body.user)
    }

    /// Log in and populate the session store.
    ///
    /// On success the store holds the issued token and a shadow copy of the
    /// account (including its current API keys).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 401 and message
    /// "Invalid credentials" for a wrong password or unknown email.
    pub async fn login(
        &self,
        email: &Email,
        password: &str,
        session: &mut SessionStore,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.api_base))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: LoginResponse = response.json().await?;

        session.set_session(body.token, body.user.into())?;
        Ok(())
    }

    /// Re-fetch the authoritative account state and replace the shadow copy.
    ///
    /// Keys issued elsewhere (another device, the CLI) are invisible to the
    /// local cache until this is called or the user logs in again.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAuthenticated` without a session token, and
    /// `ClientError::Api` if the server rejects the token.
    pub async fn refresh(&self, session: &mut SessionStore) -> Result<(), ClientError> {
        let token = session
            .token()
            .ok_or(ClientError::NotAuthenticated)?
            .to_owned();

        let response = self
            .http
            .get(format!("{}/auth/me", self.api_base))
            .bearer_auth(token)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: MeResponse = response.json().await?;

        session.replace_account(body.user.into())?;
        Ok(())
    }

    /// Request a new API key from the key-generation service.
    ///
    /// The per-account bound is checked against the shadow copy first:
    /// once it holds [`MAX_KEYS_PER_ACCOUNT`] keys this fails locally,
    /// with no network call. The bound is advisory here; the store is the
    /// authority.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::KeyLimitReached` at the local bound,
    /// `ClientError::NotAuthenticated` without a session, and
    /// `ClientError::Api` with the collaborator's message verbatim on
    /// rejection.
    pub async fn generate_key(&self, session: &mut SessionStore) -> Result<ApiKey, ClientError> {
        let (token, email, key_count) = match (session.token(), session.account()) {
            (Some(token), Some(account)) => (
                token.to_owned(),
                account.email.clone(),
                account.api_keys.len(),
            ),
            _ => return Err(ClientError::NotAuthenticated),
        };

        if key_count >= MAX_KEYS_PER_ACCOUNT {
            return Err(ClientError::KeyLimitReached);
        }

        let response = self
            .http
            .post(format!("{}/generate-key", self.api_base))
            .bearer_auth(token)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: GenerateKeyResponse = response.json().await?;

        session.append_api_key(body.api_key.clone())?;

        tracing::debug!(email = %email, "api key issued");
        Ok(body.api_key)
    }
}

/// Map a non-success response to `ClientError::Api`, surfacing the
/// service's error message verbatim.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status: StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let raw = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw).map_or(raw, |body| body.error);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
