use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A submitted phishing incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: Uuid,
    pub link: String,
    pub phone: String,
    pub approved: bool,
    pub page_title: Option<String>,
    pub impersonated_brands: Vec<String>,
    /// Set once an approval token has been issued for this report.
    pub notified_at: Option<DateTime<Utc>>,
    /// Last successful publication.
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied on submission; everything else is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub link: String,
    pub phone: String,
}

/// Where a report sits in the approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    Submitted,
    PendingApproval,
    Approved,
    Published,
}

impl Report {
    pub fn new(new: NewReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            link: new.link,
            phone: new.phone,
            approved: false,
            page_title: None,
            impersonated_brands: Vec::new(),
            notified_at: None,
            published_at: None,
            created_at: Utc::now(),
        }
    }

    /// Derived from the persisted flags. A published report that has been
    /// approved again reads as `Approved` until the next publication.
    pub fn state(&self) -> ReportState {
        if self.approved {
            ReportState::Approved
        } else if self.published_at.is_some() {
            ReportState::Published
        } else if self.notified_at.is_some() {
            ReportState::PendingApproval
        } else {
            ReportState::Submitted
        }
    }
}
