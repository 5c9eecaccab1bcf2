//! Background job: delete expired approval tokens.
//!
//! Consumption already ignores expired rows; this keeps the table small.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use crate::store::TokenStore;

pub fn spawn(tokens: Arc<dyn TokenStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) = sweep(tokens.as_ref()).await {
                tracing::error!("token sweep failed: {}", e);
            }
        }
    })
}

pub async fn sweep(tokens: &dyn TokenStore) -> anyhow::Result<u64> {
    let deleted = tokens.delete_expired_tokens().await?;
    if deleted > 0 {
        tracing::info!(rows = deleted, "deleted expired approval tokens");
    }
    Ok(deleted)
}
