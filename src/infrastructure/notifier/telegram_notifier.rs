//! Telegram Bot API notifier.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use super::service::Notifier;
use crate::error::{HttpError, NotifyError};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Retries after the first failed send.
const SEND_RETRIES: usize = 3;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

/// Sends reports to one chat through a bot.
///
/// Transient failures (timeouts, connection errors, 429, 5xx) are retried with
/// jittered exponential backoff; API rejections are returned immediately.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_api_base(client, DEFAULT_API_BASE, token, chat_id)
    }

    pub fn with_api_base(
        client: reqwest::Client,
        api_base: &str,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    fn retry_strategy() -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor(250)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(SEND_RETRIES)
    }

    async fn check(response: reqwest::Response) -> Result<(), NotifyError> {
        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(HttpError::Status {
                status: status.as_u16(),
            }
            .into());
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::Http(HttpError::from(e)))?;
        if body.ok {
            Ok(())
        } else {
            Err(NotifyError::Api(
                body.description
                    .unwrap_or_else(|| format!("status {}", status.as_u16())),
            ))
        }
    }

    async fn post_message(&self, text: &str) -> Result<(), NotifyError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(HttpError::from)?;
        Self::check(response).await
    }

    async fn post_document(
        &self,
        filename: &str,
        content: &Bytes,
        caption: &str,
    ) -> Result<(), NotifyError> {
        let part = Part::bytes(content.to_vec()).file_name(filename.to_string());
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(HttpError::from)?;
        Self::check(response).await
    }
}

fn should_retry(err: &NotifyError) -> bool {
    let transient = err.is_transient();
    if transient {
        warn!(error = %err, "Transient Telegram failure, retrying");
    }
    transient
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        RetryIf::start(Self::retry_strategy(), || self.post_message(text), should_retry).await
    }

    async fn send_document(
        &self,
        filename: &str,
        content: Bytes,
        caption: &str,
    ) -> Result<(), NotifyError> {
        RetryIf::start(
            Self::retry_strategy(),
            || self.post_document(filename, &content, caption),
            should_retry,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let notifier = TelegramNotifier::with_api_base(
            reqwest::Client::new(),
            "https://api.telegram.org/",
            "123:abc",
            "42",
        );
        assert_eq!(
            notifier.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_retry_strategy_is_bounded() {
        let delays: Vec<Duration> = TelegramNotifier::retry_strategy().collect();
        assert_eq!(delays.len(), SEND_RETRIES);
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
    }

    #[test]
    fn test_send_message_payload() {
        let payload = SendMessage {
            chat_id: "42",
            text: "oi",
            parse_mode: "Markdown",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "42");
        assert_eq!(json["parse_mode"], "Markdown");
    }

    #[tokio::test]
    async fn test_unreachable_api_fails_after_retries() {
        let notifier = TelegramNotifier::with_api_base(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            "123:abc",
            "42",
        );
        let result = notifier.send_text("hello").await;
        assert!(matches!(result, Err(NotifyError::Http(_))));
    }
}
