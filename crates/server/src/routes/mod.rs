//! HTTP route handlers for the account API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check (in main.rs)
//! GET  /health/ready  - Readiness check, pings the database (in main.rs)
//!
//! # Auth
//! POST /auth/register - Create an account
//! POST /auth/login    - Verify credentials, issue a session token
//! GET  /auth/me       - Authoritative account view (bearer token)
//! ```

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create all routes for the account API.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/auth", auth_routes())
}
