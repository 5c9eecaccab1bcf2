use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{PublishError, Publisher};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Posts public warnings through the X (Twitter) v2 API using an OAuth 2.0
/// user-context bearer token.
#[derive(Clone)]
pub struct TwitterPublisher {
    client: reqwest::Client,
    api_base: String,
    bearer_token: Option<String>,
}

impl TwitterPublisher {
    pub fn new(api_base: impl Into<String>, bearer_token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bearer_token,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.bearer_token.is_some()
    }
}

#[derive(Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

#[async_trait]
impl Publisher for TwitterPublisher {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        let Some(token) = &self.bearer_token else {
            return Err(PublishError::NotConfigured);
        };

        let resp = self
            .client
            .post(format!("{}/2/tweets", self.api_base))
            .bearer_auth(token)
            .json(&CreateTweet { text })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("tweet published");
        Ok(())
    }
}
