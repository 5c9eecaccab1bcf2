//! Persistence seams for reports and approval tokens.
//!
//! The workflow only sees the two traits below. [`postgres::PgStore`] is the
//! production backend; [`memory::MemoryStore`] backs tests and local runs.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::report::{NewReport, Report};
use crate::models::token::ApprovalToken;

pub mod memory;
pub mod postgres;

/// The store could not be reached at startup. Fatal.
#[derive(Debug, Error)]
#[error("failed to connect to report store: {0}")]
pub struct StoreConnectionError(#[source] pub anyhow::Error);

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_report(&self, new: NewReport) -> anyhow::Result<Report>;

    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>>;

    /// Most recent first.
    async fn list_reports(&self, limit: i64) -> anyhow::Result<Vec<Report>>;

    /// Reports no approval request has been issued for yet, oldest first.
    async fn list_unnotified(&self) -> anyhow::Result<Vec<Report>>;

    /// Reports approved and waiting for publication, oldest first.
    async fn list_approved(&self) -> anyhow::Result<Vec<Report>>;

    async fn save_enrichment(
        &self,
        id: Uuid,
        page_title: Option<&str>,
        brands: &[String],
    ) -> anyhow::Result<()>;

    /// Claim a report for notification. Returns `false` if another caller
    /// already claimed it.
    async fn mark_notified(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Undo [`ReportStore::mark_notified`] so a later delivery or poll picks
    /// the report up again.
    async fn release_notified(&self, id: Uuid) -> anyhow::Result<()>;

    /// Returns `false` when the report does not exist.
    async fn mark_approved(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Reset `approved` and stamp `published_at`, only if still approved.
    async fn mark_published(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_token(&self, token: &ApprovalToken) -> anyhow::Result<()>;

    /// Atomically delete an unexpired token and return it. A second call
    /// with the same value, or a call after expiry, yields `None`.
    async fn consume_token(&self, value: &str) -> anyhow::Result<Option<ApprovalToken>>;

    async fn delete_expired_tokens(&self) -> anyhow::Result<u64>;
}
