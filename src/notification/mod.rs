//! Outbound channels: the moderator notification sink and the public
//! publish sink. Both take preformatted plain text.

use async_trait::async_trait;
use thiserror::Error;

pub mod telegram;
pub mod twitter;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel not configured")]
    NotConfigured,

    #[error("notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("notification rejected: status={status}, body={body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish channel not configured")]
    NotConfigured,

    #[error("publish request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("publish rejected: status={status}, body={body}")]
    Rejected { status: u16, body: String },
}

/// Delivers approval requests to moderators.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// Emits public warnings.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<(), PublishError>;
}
