//! Authentication route handlers.
//!
//! Registration, login, and the authenticated account view. Request bodies
//! are typed schemas validated at the boundary: a malformed email never
//! reaches the service layer.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde::{Deserialize, Serialize};

use quickmailer_core::Email;

use crate::error::{ApiError, Result};
use crate::models::{AccountIdentity, AccountView};
use crate::services::auth::AuthService;
use crate::services::token::TokenError;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Email,
    pub password: String,
}

/// Registration response body.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: AccountIdentity,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

/// Login response body: the session token plus a denormalized account view.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountView,
}

/// Account view response body for `/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AccountView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `POST /auth/register`.
///
/// Hashes the password, inserts the account, and returns the created
/// identity. The store's UNIQUE constraint is the duplicate check, so two
/// concurrent registrations for the same email cannot both succeed.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let auth = AuthService::new(state.pool());

    let account = auth.register(&req.email, &req.password).await?;

    tracing::info!(account_id = %account.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully".to_string(),
            user: account.into(),
        }),
    ))
}

/// Handle `POST /auth/login`.
///
/// Verifies the credentials and issues a 7-day session token. A missing
/// account and a wrong password produce the same response; nothing is
/// persisted server-side.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());

    let account = auth.login(&req.email, &req.password).await?;
    let token = state.tokens().issue(account.id, &account.email)?;

    let api_keys = crate::db::AccountRepository::new(state.pool())
        .get_api_keys(account.id)
        .await
        .map_err(ApiError::Database)?;

    tracing::info!(account_id = %account.id, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        user: AccountView::new(account, api_keys),
    }))
}

/// Handle `GET /auth/me`.
///
/// Returns the authoritative account view for the bearer of a valid session
/// token. This is what the client SDK's `refresh()` calls instead of
/// trusting its stale local copy.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>> {
    let token = bearer_token(&headers)?;
    let claims = state.tokens().verify(token)?;

    let accounts = crate::db::AccountRepository::new(state.pool());
    let account = accounts
        .get_by_id(claims.sub)
        .await
        .map_err(ApiError::Database)?
        // A token for a deleted account is just an invalid token.
        .ok_or(ApiError::Token(TokenError::Invalid))?;

    let api_keys = accounts
        .get_api_keys(account.id)
        .await
        .map_err(ApiError::Database)?;

    Ok(Json(MeResponse {
        user: AccountView::new(account, api_keys),
    }))
}

/// Extract the bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Token(TokenError::Invalid))
}
