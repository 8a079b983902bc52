//! Notifier that only writes to the log.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use super::service::Notifier;
use crate::error::NotifyError;

/// Used when no Telegram credentials are configured.
///
/// Every report still ends up in the log output, so a dry run shows exactly
/// what would have been sent.
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        debug!("Using LogNotifier (Telegram disabled)");
        Self
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        info!(message = %text, "Report");
        Ok(())
    }

    async fn send_document(
        &self,
        filename: &str,
        content: Bytes,
        caption: &str,
    ) -> Result<(), NotifyError> {
        info!(filename, size = content.len(), caption, "Report attachment");
        Ok(())
    }
}
