use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;

use crate::webhook::channel_address;

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("provider request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("provider returned status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Outbound delivery seam. The webhook handler prefers this path and falls
/// back to embedding the reply in the TwiML response when a send fails.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError>;
}

/// Sends messages through the provider REST API with the account credential
/// pair and the configured sender number.
pub struct WhatsAppClient {
    http: reqwest::Client,
    account_sid: String,
    auth_token: SecretString,
    sender_number: String,
}

impl WhatsAppClient {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: SecretString,
        sender_number: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            account_sid: account_sid.into(),
            auth_token,
            sender_number: sender_number.into(),
        }
    }

    fn messages_url(&self) -> String {
        messages_endpoint(&self.account_sid)
    }
}

#[async_trait]
impl ReplySender for WhatsAppClient {
    async fn send(&self, to: &str, body: &str) -> Result<(), TransportError> {
        let to_address = channel_address(to);
        let params = [
            ("From", self.sender_number.as_str()),
            ("To", to_address.as_str()),
            ("Body", body),
        ];
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&params)
            .send()
            .await
            .map_err(TransportError::Request)?;

        if !response.status().is_success() {
            return Err(TransportError::Rejected(response.status()));
        }

        debug!(to = %to, "reply delivered through provider API");
        Ok(())
    }
}

/// Accepts every send without doing anything; stands in for the provider in
/// tests and local dry runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReplySender;

#[async_trait]
impl ReplySender for NoopReplySender {
    async fn send(&self, _to: &str, _body: &str) -> Result<(), TransportError> {
        Ok(())
    }
}

fn messages_endpoint(account_sid: &str) -> String {
    format!("{API_BASE}/Accounts/{account_sid}/Messages.json")
}
