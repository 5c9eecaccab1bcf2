use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{ReportStore, TokenStore};
use crate::models::report::{NewReport, Report};
use crate::models::token::ApprovalToken;

const FEED_CAPACITY: usize = 256;

/// In-process store. Per-entry updates go through DashMap's shard locks, so
/// the conditional updates keep the same single-winner semantics as the SQL
/// backend.
#[derive(Clone)]
pub struct MemoryStore {
    reports: Arc<DashMap<Uuid, Report>>,
    tokens: Arc<DashMap<String, ApprovalToken>>,
    feed: broadcast::Sender<Report>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            reports: Arc::new(DashMap::new()),
            tokens: Arc::new(DashMap::new()),
            feed,
        }
    }

    /// Receive every report inserted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.feed.subscribe()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Live tokens bound to `report_id`.
    pub fn tokens_for(&self, report_id: Uuid) -> Vec<ApprovalToken> {
        self.tokens
            .iter()
            .filter(|t| t.report_id == report_id)
            .map(|t| t.value().clone())
            .collect()
    }

    fn sorted(&self, mut rows: Vec<Report>) -> Vec<Report> {
        rows.sort_by_key(|r| r.created_at);
        rows
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert_report(&self, new: NewReport) -> anyhow::Result<Report> {
        let report = Report::new(new);
        self.reports.insert(report.id, report.clone());
        // No subscribers is fine.
        let _ = self.feed.send(report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>> {
        Ok(self.reports.get(&id).map(|r| r.value().clone()))
    }

    async fn list_reports(&self, limit: i64) -> anyhow::Result<Vec<Report>> {
        let mut rows = self.sorted(self.reports.iter().map(|r| r.value().clone()).collect());
        rows.reverse();
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn list_unnotified(&self) -> anyhow::Result<Vec<Report>> {
        Ok(self.sorted(
            self.reports
                .iter()
                .filter(|r| r.notified_at.is_none() && !r.approved)
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn list_approved(&self) -> anyhow::Result<Vec<Report>> {
        Ok(self.sorted(
            self.reports
                .iter()
                .filter(|r| r.approved)
                .map(|r| r.value().clone())
                .collect(),
        ))
    }

    async fn save_enrichment(
        &self,
        id: Uuid,
        page_title: Option<&str>,
        brands: &[String],
    ) -> anyhow::Result<()> {
        if let Some(mut r) = self.reports.get_mut(&id) {
            r.page_title = page_title.map(String::from);
            r.impersonated_brands = brands.to_vec();
        }
        Ok(())
    }

    async fn mark_notified(&self, id: Uuid) -> anyhow::Result<bool> {
        match self.reports.get_mut(&id) {
            Some(mut r) if r.notified_at.is_none() => {
                r.notified_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_notified(&self, id: Uuid) -> anyhow::Result<()> {
        if let Some(mut r) = self.reports.get_mut(&id) {
            if !r.approved {
                r.notified_at = None;
            }
        }
        Ok(())
    }

    async fn mark_approved(&self, id: Uuid) -> anyhow::Result<bool> {
        match self.reports.get_mut(&id) {
            Some(mut r) => {
                r.approved = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_published(&self, id: Uuid) -> anyhow::Result<bool> {
        match self.reports.get_mut(&id) {
            Some(mut r) if r.approved => {
                r.approved = false;
                r.published_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert_token(&self, token: &ApprovalToken) -> anyhow::Result<()> {
        self.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn consume_token(&self, value: &str) -> anyhow::Result<Option<ApprovalToken>> {
        let now = Utc::now();
        Ok(self
            .tokens
            .remove_if(value, |_, t| !t.is_expired_at(now))
            .map(|(_, t)| t))
    }

    async fn delete_expired_tokens(&self) -> anyhow::Result<u64> {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, t| !t.is_expired_at(now));
        Ok(before.saturating_sub(self.tokens.len()) as u64)
    }
}
