//! Where new reports come from.
//!
//! The workflow consumes a [`ReportSource`] and does not care whether it is
//! backed by a push feed or a polling query.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::models::report::Report;
use crate::workflow::Workflow;

pub mod change_feed;
pub mod memory;
pub mod polling;

pub use change_feed::ChangeFeedSource;
pub use memory::MemoryFeedSource;
pub use polling::PollingSource;

/// Pause after a source error before asking again.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[async_trait]
pub trait ReportSource: Send {
    /// Wait for the next new report. `Ok(None)` means the source is closed.
    async fn next_report(&mut self) -> anyhow::Result<Option<Report>>;
}

/// Which backend feeds new reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    ChangeFeed,
    Polling,
}

impl std::str::FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "change_feed" | "listen" => Ok(Self::ChangeFeed),
            "polling" | "poll" => Ok(Self::Polling),
            other => anyhow::bail!("unknown report source '{}'", other),
        }
    }
}

/// Drain `source` into the workflow until it closes.
pub async fn run(workflow: Arc<Workflow>, mut source: Box<dyn ReportSource>) {
    loop {
        match source.next_report().await {
            Ok(Some(report)) => {
                if let Err(e) = workflow.handle_new_report(&report).await {
                    tracing::error!(report_id = %report.id, error = %e, "failed to process new report");
                }
            }
            Ok(None) => {
                tracing::info!("report source closed");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "report source error");
                tokio::time::sleep(ERROR_BACKOFF).await;
            }
        }
    }
}

pub fn spawn(workflow: Arc<Workflow>, source: Box<dyn ReportSource>) -> JoinHandle<()> {
    tokio::spawn(run(workflow, source))
}
