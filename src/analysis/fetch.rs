//! Page title fetcher.
//!
//! One GET per call, bounded to 10 redirects and 5 seconds. Every failure
//! degrades to `None`; callers treat a missing title as "no signal".

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;

pub const MAX_REDIRECTS: usize = 10;
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Source of page titles for the brand identifier.
#[async_trait::async_trait]
pub trait TitleFetcher: Send + Sync {
    async fn fetch_title(&self, url: &str) -> Option<String>;
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("non-text content type: {0}")]
    NotText(String),
}

#[derive(Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("scam-hammer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        if let Some(ct) = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_textual(ct) {
                return Err(FetchError::NotText(ct.to_string()));
            }
        }

        Ok(resp.text().await?)
    }
}

#[async_trait::async_trait]
impl TitleFetcher for PageFetcher {
    async fn fetch_title(&self, url: &str) -> Option<String> {
        tracing::debug!(url, "fetching page title");
        match self.fetch_body(url).await {
            Ok(body) => {
                let title = extract_title(&body);
                match &title {
                    Some(t) => tracing::debug!(url, title = %t, "page title found"),
                    None => tracing::debug!(url, "page has no title"),
                }
                title
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "failed to fetch page title");
                None
            }
        }
    }
}

fn is_textual(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.starts_with("text/") || ct.contains("html") || ct.contains("xml")
}

/// Pull the first `<title>` element out of raw markup.
pub fn extract_title(body: &str) -> Option<String> {
    let raw = TITLE_RE.captures(body)?.get(1)?.as_str();
    let text = WHITESPACE_RE.replace_all(raw.trim(), " ");
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
