use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Interval, MissedTickBehavior};

use super::ReportSource;
use crate::models::report::Report;
use crate::store::ReportStore;

/// Pull source: every `interval`, query reports that have not been
/// notified yet and hand them out one by one.
pub struct PollingSource {
    store: Arc<dyn ReportStore>,
    interval: Interval,
    pending: VecDeque<Report>,
}

impl PollingSource {
    pub fn new(store: Arc<dyn ReportStore>, every: Duration) -> Self {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            store,
            interval,
            pending: VecDeque::new(),
        }
    }
}

#[async_trait]
impl ReportSource for PollingSource {
    async fn next_report(&mut self) -> anyhow::Result<Option<Report>> {
        loop {
            if let Some(report) = self.pending.pop_front() {
                return Ok(Some(report));
            }
            self.interval.tick().await;
            let batch = self.store.list_unnotified().await?;
            if !batch.is_empty() {
                tracing::debug!(count = batch.len(), "polled new reports");
            }
            self.pending.extend(batch);
        }
    }
}
