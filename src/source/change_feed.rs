use std::collections::VecDeque;

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use uuid::Uuid;

use super::ReportSource;
use crate::models::report::Report;
use crate::store::postgres::PgStore;
use crate::store::ReportStore;

/// Push source backed by Postgres LISTEN/NOTIFY on report inserts.
///
/// Reports still unnotified when the listener comes up (inserted while the
/// server was down) are handed out first. Notifications sent while the
/// listener is reconnecting are lost; run a [`super::PollingSource`]
/// alongside if that matters.
pub struct ChangeFeedSource {
    store: PgStore,
    listener: PgListener,
    backlog: VecDeque<Report>,
}

impl ChangeFeedSource {
    pub async fn connect(store: PgStore) -> anyhow::Result<Self> {
        let listener = store.listen_report_inserts().await?;
        // LISTEN is active before the scan, so nothing falls in between.
        let backlog: VecDeque<Report> = store.list_unnotified().await?.into();
        tracing::info!(backlog = backlog.len(), "listening for report inserts");
        Ok(Self {
            store,
            listener,
            backlog,
        })
    }
}

#[async_trait]
impl ReportSource for ChangeFeedSource {
    async fn next_report(&mut self) -> anyhow::Result<Option<Report>> {
        if let Some(report) = self.backlog.pop_front() {
            return Ok(Some(report));
        }
        loop {
            let notification = self.listener.recv().await?;
            let Ok(id) = Uuid::parse_str(notification.payload()) else {
                tracing::warn!(payload = notification.payload(), "ignoring malformed report notification");
                continue;
            };

            match self.store.get_report(id).await? {
                Some(report) => return Ok(Some(report)),
                None => tracing::warn!(report_id = %id, "notified report no longer exists"),
            }
        }
    }
}
