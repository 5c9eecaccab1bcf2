//! Report approval workflow.
//!
//! ```text
//! SUBMITTED ──(new report observed)──▶ PENDING_APPROVAL
//! PENDING_APPROVAL ──(token redeemed)──▶ APPROVED
//! APPROVED ──(publish succeeds)──▶ PUBLISHED
//! ```
//!
//! Notification and publish failures never roll back state. A failed
//! notification leaves the report pending; a failed publication leaves it
//! approved so the periodic job tries again.

use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{self, identify_all, resolve_country, CountryInfo, MatchedVia, TitleFetcher};
use crate::metrics;
use crate::models::report::Report;
use crate::models::token::ApprovalToken;
use crate::notification::{Notifier, PublishError, Publisher};
use crate::store::{ReportStore, TokenStore};

pub mod message;

/// When an approved report gets published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Inside the approval request.
    Immediate,
    /// By the background publish job.
    Periodic,
}

impl std::str::FromStr for PublishMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "periodic" => Ok(Self::Periodic),
            other => anyhow::bail!("unknown publish mode '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub public_base_url: String,
    pub token_ttl: Duration,
    pub publish_mode: PublishMode,
    /// Fetch the page title when the URL names no brand.
    pub fetch_titles: bool,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("token not found or expired")]
    TokenNotFoundOrExpired,

    #[error("report not found")]
    ReportNotFound,

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

/// What Trigger A produced for one report.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub report: Report,
    pub country: CountryInfo,
    pub matched_via: MatchedVia,
    pub token: ApprovalToken,
    pub notified: bool,
}

#[derive(Debug, Clone)]
pub struct Redemption {
    pub report: Report,
    /// Only ever true in [`PublishMode::Immediate`].
    pub published: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub published: usize,
    pub failed: usize,
}

pub struct Workflow {
    reports: Arc<dyn ReportStore>,
    tokens: Arc<dyn TokenStore>,
    fetcher: Arc<dyn TitleFetcher>,
    notifier: Arc<dyn Notifier>,
    publisher: Arc<dyn Publisher>,
    config: WorkflowConfig,
}

impl Workflow {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        tokens: Arc<dyn TokenStore>,
        fetcher: Arc<dyn TitleFetcher>,
        notifier: Arc<dyn Notifier>,
        publisher: Arc<dyn Publisher>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            reports,
            tokens,
            fetcher,
            notifier,
            publisher,
            config,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn reports(&self) -> &Arc<dyn ReportStore> {
        &self.reports
    }

    /// Trigger A: enrich a newly observed report, issue its approval token
    /// and notify moderators.
    ///
    /// Returns `Ok(None)` when the report was already claimed (e.g. delivered
    /// by both the change feed and a poll). If enrichment or token issuance
    /// fails the claim is released, so the next delivery or poll retries.
    pub async fn handle_new_report(&self, report: &Report) -> Result<Option<Enrichment>, WorkflowError> {
        if !self.reports.mark_notified(report.id).await? {
            tracing::debug!(report_id = %report.id, "report already claimed, skipping");
            return Ok(None);
        }

        let (report, country, matched_via, token) = match self.enrich_and_issue(report).await {
            Ok(issued) => issued,
            Err(e) => {
                if let Err(release) = self.reports.release_notified(report.id).await {
                    tracing::error!(report_id = %report.id, error = %release, "failed to release report claim");
                }
                return Err(e);
            }
        };

        let text = message::approval_request(
            &report,
            &country,
            &message::approval_url(&self.config.public_base_url, &token.token),
        );
        let notified = match self.notifier.notify(&text).await {
            Ok(()) => {
                metrics::NOTIFICATIONS.with_label_values(&["sent"]).inc();
                true
            }
            Err(e) => {
                metrics::NOTIFICATIONS.with_label_values(&["failed"]).inc();
                tracing::error!(report_id = %report.id, error = %e, "failed to send approval notification");
                false
            }
        };

        Ok(Some(Enrichment {
            report,
            country,
            matched_via,
            token,
            notified,
        }))
    }

    async fn enrich_and_issue(
        &self,
        report: &Report,
    ) -> Result<(Report, CountryInfo, MatchedVia, ApprovalToken), WorkflowError> {
        let (brand, page_title) = if self.config.fetch_titles {
            let a = analysis::analyze_url(&report.link, self.fetcher.as_ref()).await;
            (a.brand, a.page_title)
        } else {
            (analysis::identify_first(&report.link, None), None)
        };
        let brands = identify_all(&report.link, page_title.as_deref());
        let country = resolve_country(&report.phone);

        metrics::BRAND_MATCHES
            .with_label_values(&[match brand.matched_via {
                MatchedVia::Url => "url",
                MatchedVia::Title => "title",
                MatchedVia::None => "none",
            }])
            .inc();
        tracing::info!(
            report_id = %report.id,
            brand = ?brand.brand,
            matched_via = ?brand.matched_via,
            country = %country.country,
            "report enriched"
        );

        self.reports
            .save_enrichment(report.id, page_title.as_deref(), &brands)
            .await?;

        let token = ApprovalToken::issue(report.id, self.config.token_ttl);
        self.tokens.insert_token(&token).await?;
        metrics::REPORTS_PROCESSED.inc();

        let mut report = report.clone();
        report.page_title = page_title;
        report.impersonated_brands = brands;

        Ok((report, country, brand.matched_via, token))
    }

    /// Trigger B: redeem an approval token.
    pub async fn redeem(&self, token_value: &str) -> Result<Redemption, WorkflowError> {
        let Some(token) = self.tokens.consume_token(token_value).await? else {
            metrics::REDEMPTIONS.with_label_values(&["not_found"]).inc();
            tracing::warn!("approval token not found or expired");
            return Err(WorkflowError::TokenNotFoundOrExpired);
        };

        if !self.reports.mark_approved(token.report_id).await? {
            metrics::REDEMPTIONS.with_label_values(&["report_missing"]).inc();
            tracing::warn!(report_id = %token.report_id, "token referenced a missing report");
            return Err(WorkflowError::ReportNotFound);
        }
        let report = self.load(token.report_id).await?;
        metrics::REDEMPTIONS.with_label_values(&["approved"]).inc();
        tracing::info!(report_id = %report.id, "report approved");

        if self.config.publish_mode == PublishMode::Periodic {
            return Ok(Redemption {
                report,
                published: false,
            });
        }

        match self.publish_report(&report).await {
            Ok(()) => {
                let report = self.load(report.id).await?;
                Ok(Redemption {
                    report,
                    published: true,
                })
            }
            Err(e) => {
                tracing::error!(report_id = %report.id, error = %e, "immediate publish failed, left approved");
                Ok(Redemption {
                    report,
                    published: false,
                })
            }
        }
    }

    /// Publish one approved report and reset its approval flag.
    pub async fn publish_report(&self, report: &Report) -> Result<(), PublishError> {
        let text = message::public_warning(report, &self.config.public_base_url);
        if let Err(e) = self.publisher.publish(&text).await {
            metrics::PUBLICATIONS.with_label_values(&["failed"]).inc();
            return Err(e);
        }
        metrics::PUBLICATIONS.with_label_values(&["published"]).inc();

        match self.reports.mark_published(report.id).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(report_id = %report.id, "report was no longer approved after publishing"),
            // Already public; the next cycle may post it again.
            Err(e) => tracing::error!(report_id = %report.id, error = %e, "failed to reset approval after publishing"),
        }
        Ok(())
    }

    /// Trigger C: publish every approved report, one at a time.
    pub async fn publish_approved(&self) -> anyhow::Result<PublishSummary> {
        let approved = self.reports.list_approved().await?;
        let mut summary = PublishSummary::default();

        for report in &approved {
            match self.publish_report(report).await {
                Ok(()) => summary.published += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(report_id = %report.id, error = %e, "failed to publish report, will retry next cycle");
                }
            }
        }

        Ok(summary)
    }

    async fn load(&self, id: Uuid) -> Result<Report, WorkflowError> {
        self.reports
            .get_report(id)
            .await?
            .ok_or(WorkflowError::ReportNotFound)
    }
}
