//! Background job: publish approved reports.
//!
//! Every tick lists approved reports and publishes them sequentially. A
//! failed publication keeps the report approved, so the next tick retries it.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

use crate::workflow::Workflow;

/// Spawn the periodic publisher. Call this once at startup.
pub fn spawn(workflow: Arc<Workflow>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            run_once(&workflow).await;
        }
    })
}

async fn run_once(workflow: &Workflow) {
    match workflow.publish_approved().await {
        Ok(summary) if summary.published + summary.failed > 0 => {
            tracing::info!(
                published = summary.published,
                failed = summary.failed,
                "publish cycle finished"
            );
        }
        Ok(_) => {}
        Err(e) => tracing::error!("publish job failed: {}", e),
    }
}
