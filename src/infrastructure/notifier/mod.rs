//! Report delivery channels.
//!
//! Provides a [`Notifier`] trait with two implementations:
//! - [`TelegramNotifier`] - Telegram Bot API (`sendMessage`, `sendDocument`)
//! - [`LogNotifier`] - log-only fallback when no credentials are configured

mod log_notifier;
mod service;
mod telegram_notifier;

pub use log_notifier::LogNotifier;
pub use service::Notifier;
pub use telegram_notifier::{DEFAULT_API_BASE, TelegramNotifier};

#[cfg(test)]
pub use service::MockNotifier;
