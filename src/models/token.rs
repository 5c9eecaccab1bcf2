use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Random bytes per token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Single-use approval credential bound to one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApprovalToken {
    pub token: String,
    pub report_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ApprovalToken {
    /// Mint a fresh token for `report_id` valid for `ttl`.
    pub fn issue(report_id: Uuid, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token: generate_token_value(),
            report_id,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 32 bytes from the OS RNG, lowercase hex.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Cheap shape check before touching the store. Case-insensitive; callers
/// lowercase before lookup.
pub fn is_well_formed(value: &str) -> bool {
    value.len() == TOKEN_BYTES * 2 && value.bytes().all(|b| b.is_ascii_hexdigit())
}
