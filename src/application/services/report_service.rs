//! Formatting and delivery of processing results.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::entities::ProcessingResult;
use crate::infrastructure::notifier::Notifier;
use crate::utils::dates::{format_compact_date, format_display_date, format_marker_date};
use crate::utils::text::{escape_markdown, split_message};

/// Telegram's message length limit, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Largest attachment the Bot API accepts.
pub const MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// Hands a [`ProcessingResult`] to the outside world.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Delivers the result. Delivery failures are logged, never returned.
    async fn report(&self, result: &ProcessingResult);
}

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub target_name: String,
    pub max_message_chars: usize,
    /// Pause between the parts of a split message.
    pub part_pause: Duration,
    pub max_attachment_bytes: usize,
}

impl ReportSettings {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            max_message_chars: MAX_MESSAGE_CHARS,
            part_pause: Duration::from_secs(1),
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
        }
    }
}

/// Builds the report text and sends it, followed by the PDF when entries
/// were found.
pub struct ReportService {
    notifier: Arc<dyn Notifier>,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(notifier: Arc<dyn Notifier>, settings: ReportSettings) -> Self {
        Self { notifier, settings }
    }

    /// Renders the Markdown report for `result`.
    pub fn compose_message(&self, result: &ProcessingResult) -> String {
        let name = escape_markdown(&self.settings.target_name);
        let date = format_display_date(result.date);

        if !result.has_entries() {
            return format!(
                "ℹ️ Nenhuma entrada para '{name}' encontrada no DOU de {date} (Seção 3)."
            );
        }

        let mut message =
            format!("🚨 *Entradas encontradas* para '{name}' no DOU de {date} (Seção 3):\n\n");
        for entry in &result.entries {
            message.push_str(&format!(
                "📄 *Página {}*:\n{}\n\n---\n\n",
                entry.page,
                escape_markdown(&entry.text)
            ));
        }
        if result.document.is_some() {
            message.push_str("📎 PDF do DOU anexado abaixo.");
        }
        message
    }

    async fn send_message(&self, result: &ProcessingResult, message: &str) {
        let date_str = format_marker_date(result.date);
        let parts = split_message(message, self.settings.max_message_chars);
        let total = parts.len();

        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.part_pause).await;
            }
            match self.notifier.send_text(part).await {
                Ok(()) => info!(date = %date_str, part = index + 1, total, "Message sent"),
                Err(e) => {
                    error!(date = %date_str, part = index + 1, total, error = %e, "Failed to send message")
                }
            }
        }
    }

    async fn send_attachment(&self, result: &ProcessingResult) {
        let Some(document) = result.document.clone() else {
            return;
        };
        let date_str = format_marker_date(result.date);

        if document.len() > self.settings.max_attachment_bytes {
            warn!(date = %date_str, size = document.len(), "PDF exceeds 20MB, not sent");
            if let Err(e) = self
                .notifier
                .send_text("PDF muito grande para enviar (>20MB).")
                .await
            {
                error!(date = %date_str, error = %e, "Failed to send size warning");
            }
            return;
        }

        let filename = format!("dou_{}.pdf", format_compact_date(result.date));
        let caption = format!("DOU Seção 3 - {}", format_display_date(result.date));
        match self
            .notifier
            .send_document(&filename, document, &caption)
            .await
        {
            Ok(()) => info!(date = %date_str, "PDF sent"),
            Err(e) => error!(date = %date_str, error = %e, "Failed to send PDF"),
        }
    }
}

#[async_trait]
impl ResultReporter for ReportService {
    async fn report(&self, result: &ProcessingResult) {
        let message = self.compose_message(result);
        self.send_message(result, &message).await;

        if result.has_entries() {
            self.send_attachment(result).await;
        }
    }
}
