//! Test send command.
//!
//! End-to-end check of the external send-email endpoint, using the same
//! client the SDK ships.
//!
//! # Usage
//!
//! ```bash
//! qm-cli send --to you@example.com --subject Hello --message "It works!" \
//!     --api-key pk_xxx
//! ```
//!
//! # Environment Variables
//!
//! - `QUICKMAILER_MAIL_BASE_URL` - Endpoint base URL, used when
//!   `--base-url` is not given

use quickmailer_client::MailClient;
use quickmailer_core::{ApiKey, Email};

use super::CommandError;

/// Send one email through the external endpoint and print its response.
pub async fn run(
    to: &str,
    subject: &str,
    message: &str,
    api_key: &str,
    base_url: Option<&str>,
) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let to = Email::parse(to).map_err(|e| CommandError::InvalidEmail(format!("{to}: {e}")))?;
    let api_key = ApiKey::parse(api_key).map_err(|e| CommandError::InvalidApiKey(e.to_string()))?;

    let base_url = match base_url {
        Some(url) => url.to_owned(),
        None => std::env::var("QUICKMAILER_MAIL_BASE_URL")
            .map_err(|_| CommandError::MissingEnvVar("QUICKMAILER_MAIL_BASE_URL"))?,
    };

    tracing::info!(to = %to, subject, "Sending email...");

    let client = MailClient::new(base_url);
    let response = client.send_email(&to, subject, message, &api_key).await?;

    tracing::info!("Email accepted by endpoint");

    #[allow(clippy::print_stdout)]
    {
        println!("{response}");
    }

    Ok(())
}
