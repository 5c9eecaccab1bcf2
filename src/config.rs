use std::time::Duration;

use crate::notification::{telegram, twitter};
use crate::source::SourceKind;
use crate::workflow::{PublishMode, WorkflowConfig};

pub const MIN_TOKEN_TTL_MINUTES: i64 = 15;
pub const MAX_TOKEN_TTL_MINUTES: i64 = 180;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Base for approval links and the reference URL in public warnings.
    pub public_base_url: String,
    pub telegram_api_base: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<i64>,
    pub twitter_api_base: String,
    pub twitter_bearer_token: Option<String>,
    /// Clamped to 15..=180.
    pub token_ttl_minutes: i64,
    pub publish_mode: PublishMode,
    pub publish_interval: Duration,
    pub report_source: SourceKind,
    pub poll_interval: Duration,
    pub token_sweep_interval: Duration,
    pub fetch_titles: bool,
    pub production: bool,
}

impl Config {
    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            public_base_url: self.public_base_url.clone(),
            token_ttl: chrono::Duration::minutes(self.token_ttl_minutes),
            publish_mode: self.publish_mode,
            fetch_titles: self.fetch_titles,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

/// Build a [`Config`] from any key lookup (the process environment in
/// production).
pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let env_mode = get("SCAM_HAMMER_ENV").unwrap_or_default();
    let production = env_mode == "production";

    let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").filter(|s| !s.trim().is_empty());
    let telegram_chat_id = match get("TELEGRAM_CHAT_ID") {
        Some(v) => Some(
            v.trim()
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("TELEGRAM_CHAT_ID must be an integer, got '{}'", v))?,
        ),
        None => None,
    };
    let twitter_bearer_token = get("TWITTER_BEARER_TOKEN").filter(|s| !s.trim().is_empty());

    let missing: Vec<&str> = [
        ("TELEGRAM_BOT_TOKEN", telegram_bot_token.is_none()),
        ("TELEGRAM_CHAT_ID", telegram_chat_id.is_none()),
        ("TWITTER_BEARER_TOKEN", twitter_bearer_token.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, is_missing)| is_missing.then_some(name))
    .collect();
    if !missing.is_empty() {
        if production {
            anyhow::bail!("missing required settings in production: {}", missing.join(", "));
        }
        tracing::warn!(
            missing = %missing.join(", "),
            "delivery channels not fully configured; notifications or publications will fail"
        );
    }

    let requested_ttl: i64 = parse_or(get("TOKEN_TTL_MINUTES"), MIN_TOKEN_TTL_MINUTES);
    let token_ttl_minutes = requested_ttl.clamp(MIN_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES);
    if token_ttl_minutes != requested_ttl {
        tracing::warn!(
            requested = requested_ttl,
            using = token_ttl_minutes,
            "TOKEN_TTL_MINUTES out of range, clamped"
        );
    }

    let publish_mode = match get("PUBLISH_MODE") {
        Some(v) => v.parse()?,
        None => PublishMode::Periodic,
    };
    let report_source = match get("REPORT_SOURCE") {
        Some(v) => v.parse()?,
        None => SourceKind::ChangeFeed,
    };

    Ok(Config {
        port: parse_or(get("SCAM_HAMMER_PORT"), 7331),
        database_url: get("DATABASE_URL")
            .unwrap_or_else(|| "postgres://localhost/scam_hammer".into()),
        public_base_url: get("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "https://scam-hammer.com".into())
            .trim_end_matches('/')
            .to_string(),
        telegram_api_base: get("TELEGRAM_API_BASE")
            .unwrap_or_else(|| telegram::DEFAULT_API_BASE.into()),
        telegram_bot_token,
        telegram_chat_id,
        twitter_api_base: get("TWITTER_API_BASE").unwrap_or_else(|| twitter::DEFAULT_API_BASE.into()),
        twitter_bearer_token,
        token_ttl_minutes,
        publish_mode,
        publish_interval: Duration::from_secs(parse_or(get("PUBLISH_INTERVAL_SECS"), 60u64).max(1)),
        report_source,
        poll_interval: Duration::from_secs(parse_or(get("POLL_INTERVAL_SECS"), 30u64).max(1)),
        token_sweep_interval: Duration::from_secs(
            parse_or(get("TOKEN_SWEEP_INTERVAL_SECS"), 60u64).max(1),
        ),
        fetch_titles: parse_bool(get("FETCH_PAGE_TITLES"), true),
        production,
    })
}
