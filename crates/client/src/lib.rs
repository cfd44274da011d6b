//! QuickMailer SDK.
//!
//! The client-side half of QuickMailer: everything the original web UI did
//! with browser storage and `fetch`, as an explicit, injectable API.
//!
//! - [`SessionStore`] - persistent session context (token + shadow account),
//!   the replacement for scattered browser-local state
//! - [`QuickMailerClient`] - account API and key issuance client
//! - [`MailClient`] - the mail dispatch wrapper around the external
//!   send-email endpoint
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), quickmailer_client::ClientError> {
//! use quickmailer_client::{MailClient, QuickMailerClient, SessionStore};
//! use quickmailer_core::Email;
//!
//! let mut session = SessionStore::open("session.json")?;
//! let client = QuickMailerClient::new("https://api.quickmailer.dev");
//!
//! let email = Email::parse("me@example.com").expect("valid email");
//! client.login(&email, "hunter2hunter2", &mut session).await?;
//! let key = client.generate_key(&mut session).await?;
//!
//! let mail = MailClient::new("https://api.quickmailer.dev");
//! let to = Email::parse("you@example.com").expect("valid email");
//! mail.send_email(&to, "Hello", "It works!", &key).await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod mail;
pub mod session;

pub use api::{QuickMailerClient, RegisteredAccount};
pub use error::ClientError;
pub use mail::MailClient;
pub use session::{SessionAccount, SessionStore};
