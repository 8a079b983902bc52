//! Notifier trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::NotifyError;

/// Outbound channel for reports.
///
/// # Implementations
///
/// - [`crate::infrastructure::notifier::TelegramNotifier`] - Telegram Bot API
/// - [`crate::infrastructure::notifier::LogNotifier`] - writes reports to the log
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends one text message. Callers keep `text` within the channel's length limit.
    async fn send_text(&self, text: &str) -> Result<(), NotifyError>;

    /// Sends a file attachment with a caption.
    async fn send_document(
        &self,
        filename: &str,
        content: Bytes,
        caption: &str,
    ) -> Result<(), NotifyError>;
}
