use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{NotifyError, Notifier};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends moderator messages through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<i64>,
}

impl TelegramNotifier {
    pub fn new(api_base: impl Into<String>, bot_token: Option<String>, chat_id: Option<i64>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
            chat_id,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, self.chat_id) else {
            tracing::warn!("Telegram bot token or chat id not configured, skipping notification");
            return Err(NotifyError::NotConfigured);
        };

        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);
        let resp = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id,
                text,
                disable_web_page_preview: true,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(chat_id, "sent Telegram notification");
        Ok(())
    }
}
