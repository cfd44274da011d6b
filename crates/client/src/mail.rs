//! Mail dispatch client.
//!
//! Thin wrapper around the external send-email endpoint. The endpoint owns
//! delivery; this client authenticates with an API key, forwards the
//! message fields, and hands back the endpoint's response body untouched.

use quickmailer_core::{ApiKey, Email};

use crate::error::ClientError;

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the external send-email endpoint.
#[derive(Clone)]
pub struct MailClient {
    http: reqwest::Client,
    base_url: String,
}

impl MailClient {
    /// Create a new mail client for the given endpoint base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Send an email through the external endpoint.
    ///
    /// A single request is made; no retries. On success the endpoint's JSON
    /// response is returned unchanged, since its shape is owned by the
    /// endpoint, not this client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::DispatchFailed` carrying the status and body
    /// for any non-2xx response, and `ClientError::Http` on transport
    /// failure.
    pub async fn send_email(
        &self,
        to: &Email,
        subject: &str,
        message: &str,
        api_key: &ApiKey,
    ) -> Result<serde_json::Value, ClientError> {
        let response = self
            .http
            .post(format!("{}/send-email", self.base_url))
            .header(API_KEY_HEADER, api_key.as_str())
            .json(&serde_json::json!({
                "to": to,
                "subject": subject,
                "message": message,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::DispatchFailed {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(to = %to, subject, "email dispatched");
        let body: serde_json::Value = response.json().await?;
        Ok(body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recipient() -> Email {
        Email::parse("you@example.com").unwrap()
    }

    fn key() -> ApiKey {
        ApiKey::parse("pk_test_key").unwrap()
    }

    #[tokio::test]
    async fn test_send_email_passes_response_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-email"))
            .and(header("x-api-key", "pk_test_key"))
            .and(body_json(json!({
                "to": "you@example.com",
                "subject": "Hello",
                "message": "It works!",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "123" })))
            .mount(&server)
            .await;

        let client = MailClient::new(server.uri());
        let body = client
            .send_email(&recipient(), "Hello", "It works!", &key())
            .await
            .unwrap();

        assert_eq!(body, json!({ "id": "123" }));
    }

    #[tokio::test]
    async fn test_non_success_is_dispatch_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-email"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = MailClient::new(server.uri());
        let err = client
            .send_email(&recipient(), "Hello", "It works!", &key())
            .await
            .unwrap_err();

        match err {
            ClientError::DispatchFailed { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("expected DispatchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_key_is_dispatch_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-email"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid api key" })),
            )
            .mount(&server)
            .await;

        let client = MailClient::new(server.uri());
        let err = client
            .send_email(&recipient(), "Hello", "It works!", &key())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::DispatchFailed { status: 401, .. }
        ));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url_is_trimmed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-email"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
            .mount(&server)
            .await;

        let client = MailClient::new(format!("{}/", server.uri()));
        let body = client
            .send_email(&recipient(), "s", "m", &key())
            .await
            .unwrap();

        assert_eq!(body["id"], "1");
    }
}
