use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};

use super::ReportSource;
use crate::models::report::Report;
use crate::store::memory::MemoryStore;

/// Push source over [`MemoryStore`]'s insert broadcast.
pub struct MemoryFeedSource {
    rx: broadcast::Receiver<Report>,
}

impl MemoryFeedSource {
    pub fn new(store: &MemoryStore) -> Self {
        Self { rx: store.subscribe() }
    }
}

#[async_trait]
impl ReportSource for MemoryFeedSource {
    async fn next_report(&mut self) -> anyhow::Result<Option<Report>> {
        loop {
            match self.rx.recv().await {
                Ok(report) => return Ok(Some(report)),
                Err(RecvError::Closed) => return Ok(None),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "memory feed lagged, reports dropped");
                }
            }
        }
    }
}
