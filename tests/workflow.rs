//! End-to-end workflow: report → token → approval → publication, on the
//! in-memory store.

mod common;

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use std::sync::atomic::Ordering;

use common::{flaky_harness, harness, BASE_URL};
use scam_hammer::analysis::MatchedVia;
use scam_hammer::models::report::{NewReport, ReportState};
use scam_hammer::models::token::ApprovalToken;
use scam_hammer::jobs;
use scam_hammer::source::{self, MemoryFeedSource};
use scam_hammer::store::{ReportStore, TokenStore};
use scam_hammer::workflow::{PublishMode, WorkflowError};

fn paypal_report() -> NewReport {
    NewReport {
        link: "http://paypal-secure-login.fake".into(),
        phone: "+34600111222".into(),
    }
}

#[tokio::test]
async fn test_full_cycle_periodic_publish() {
    let h = harness(PublishMode::Periodic, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();

    // Trigger A
    let enrichment = h
        .workflow
        .handle_new_report(&report)
        .await
        .unwrap()
        .expect("report should be claimed");
    assert_eq!(enrichment.report.impersonated_brands, vec!["PayPal".to_string()]);
    assert_eq!(enrichment.matched_via, MatchedVia::Url);
    assert_eq!(enrichment.country.country, "Spain");
    assert!(enrichment.notified);
    assert!(h.fetcher.calls.lock().unwrap().is_empty(), "url matched, no fetch expected");

    let notes = h.notifier.messages();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].contains("http:[slash][slash]paypal-secure-login[dot]fake"));
    assert!(notes[0].contains("+34600111222"));
    assert!(notes[0].contains("Spain"));
    assert!(notes[0].contains("PayPal"));
    assert!(notes[0].contains(&format!("{}/aprobar/{}", BASE_URL, enrichment.token.token)));

    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), ReportState::PendingApproval);
    assert_eq!(stored.impersonated_brands, vec!["PayPal".to_string()]);

    // Trigger B
    let redemption = h.workflow.redeem(&enrichment.token.token).await.unwrap();
    assert!(redemption.report.approved);
    assert!(!redemption.published);
    assert!(h.publisher.messages().is_empty());

    // Trigger C
    let summary = h.workflow.publish_approved().await.unwrap();
    assert_eq!(summary.published, 1);
    assert_eq!(summary.failed, 0);
    let posts = h.publisher.messages();
    assert_eq!(posts.len(), 1);
    assert!(posts[0].contains("paypal-secure-login[dot]fake"));

    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert!(!stored.approved);
    assert_eq!(stored.state(), ReportState::Published);

    // Nothing left to publish on the next tick.
    let summary = h.workflow.publish_approved().await.unwrap();
    assert_eq!(summary.published, 0);
    assert_eq!(h.publisher.messages().len(), 1);
}

#[tokio::test]
async fn test_token_is_single_use() {
    let h = harness(PublishMode::Periodic, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();
    let token = h.workflow.handle_new_report(&report).await.unwrap().unwrap().token;

    assert!(h.workflow.redeem(&token.token).await.is_ok());
    assert!(matches!(
        h.workflow.redeem(&token.token).await,
        Err(WorkflowError::TokenNotFoundOrExpired)
    ));
}

#[tokio::test]
async fn test_concurrent_redemptions_approve_once() {
    let h = harness(PublishMode::Periodic, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();
    let token = h.workflow.handle_new_report(&report).await.unwrap().unwrap().token;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let wf = h.workflow.clone();
        let value = token.token.clone();
        handles.push(tokio::spawn(async move { wf.redeem(&value).await.is_ok() }));
    }
    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let h = harness(PublishMode::Periodic, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();

    let mut token = ApprovalToken::issue(report.id, Duration::minutes(15));
    token.created_at = Utc::now() - Duration::minutes(20);
    token.expires_at = Utc::now() - Duration::minutes(5);
    h.store.insert_token(&token).await.unwrap();

    assert!(matches!(
        h.workflow.redeem(&token.token).await,
        Err(WorkflowError::TokenNotFoundOrExpired)
    ));
    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert!(!stored.approved);
}

#[tokio::test]
async fn test_token_for_missing_report() {
    let h = harness(PublishMode::Periodic, None);
    let token = ApprovalToken::issue(uuid::Uuid::new_v4(), Duration::minutes(15));
    h.store.insert_token(&token).await.unwrap();

    assert!(matches!(
        h.workflow.redeem(&token.token).await,
        Err(WorkflowError::ReportNotFound)
    ));
}

#[tokio::test]
async fn test_title_fallback_enriches_report() {
    let h = harness(PublishMode::Periodic, Some("Correos: su paquete está retenido"));
    let report = h
        .store
        .insert_report(NewReport {
            link: "http://a1b2c3.top/track".into(),
            phone: "+447700900123".into(),
        })
        .await
        .unwrap();

    let e = h.workflow.handle_new_report(&report).await.unwrap().unwrap();
    assert_eq!(e.matched_via, MatchedVia::Title);
    assert_eq!(e.report.impersonated_brands, vec!["Correos".to_string()]);
    assert_eq!(e.country.country, "United Kingdom");
    assert_eq!(h.fetcher.calls.lock().unwrap().len(), 1);

    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert_eq!(stored.page_title.as_deref(), Some("Correos: su paquete está retenido"));
}

#[tokio::test]
async fn test_unknown_brand_notification_fallback() {
    let h = harness(PublishMode::Periodic, None);
    let report = h
        .store
        .insert_report(NewReport {
            link: "http://a1b2c3.top".into(),
            phone: "+999000".into(),
        })
        .await
        .unwrap();

    let e = h.workflow.handle_new_report(&report).await.unwrap().unwrap();
    assert_eq!(e.matched_via, MatchedVia::None);
    let note = &h.notifier.messages()[0];
    assert!(note.contains("Impersonated brands: Unknown"));
    assert!(note.contains("Unknown"));
}

#[tokio::test]
async fn test_notification_failure_keeps_token_and_state() {
    let h = harness(PublishMode::Periodic, None);
    h.notifier.set_failing(true);
    let report = h.store.insert_report(paypal_report()).await.unwrap();

    let e = h.workflow.handle_new_report(&report).await.unwrap().unwrap();
    assert!(!e.notified);
    assert_eq!(h.store.tokens_for(report.id).len(), 1);
    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), ReportState::PendingApproval);

    // The token still works once a moderator gets hold of it.
    assert!(h.workflow.redeem(&e.token.token).await.is_ok());
}

#[tokio::test]
async fn test_duplicate_delivery_is_processed_once() {
    let h = harness(PublishMode::Periodic, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();

    assert!(h.workflow.handle_new_report(&report).await.unwrap().is_some());
    assert!(h.workflow.handle_new_report(&report).await.unwrap().is_none());
    assert_eq!(h.notifier.messages().len(), 1);
    assert_eq!(h.store.tokens_for(report.id).len(), 1);
}

#[tokio::test]
async fn test_publish_failure_is_retried_next_cycle() {
    let h = harness(PublishMode::Periodic, None);
    let first = h.store.insert_report(paypal_report()).await.unwrap();
    tokio::time::sleep(StdDuration::from_millis(5)).await;
    let second = h
        .store
        .insert_report(NewReport {
            link: "http://bbva-alerta.top".into(),
            phone: "611222333".into(),
        })
        .await
        .unwrap();
    h.store.mark_approved(first.id).await.unwrap();
    h.store.mark_approved(second.id).await.unwrap();

    h.publisher.set_failing(true);
    let summary = h.workflow.publish_approved().await.unwrap();
    assert_eq!(summary.published, 0);
    assert_eq!(summary.failed, 2);
    assert_eq!(h.store.list_approved().await.unwrap().len(), 2);

    h.publisher.set_failing(false);
    let summary = h.workflow.publish_approved().await.unwrap();
    assert_eq!(summary.published, 2);
    assert!(h.store.list_approved().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_immediate_mode_publishes_in_request() {
    let h = harness(PublishMode::Immediate, None);
    let report = h.store.insert_report(paypal_report()).await.unwrap();
    let token = h.workflow.handle_new_report(&report).await.unwrap().unwrap().token;

    let redemption = h.workflow.redeem(&token.token).await.unwrap();
    assert!(redemption.published);
    assert!(!redemption.report.approved);
    assert_eq!(redemption.report.state(), ReportState::Published);
    assert_eq!(h.publisher.messages().len(), 1);
}

#[tokio::test]
async fn test_immediate_mode_publish_failure_leaves_report_approved() {
    let h = harness(PublishMode::Immediate, None);
    h.publisher.set_failing(true);
    let report = h.store.insert_report(paypal_report()).await.unwrap();
    let token = h.workflow.handle_new_report(&report).await.unwrap().unwrap().token;

    let redemption = h.workflow.redeem(&token.token).await.unwrap();
    assert!(!redemption.published);
    assert!(redemption.report.approved);
}

#[tokio::test]
async fn test_memory_feed_drives_workflow() {
    let h = harness(PublishMode::Periodic, None);
    let task = source::spawn(h.workflow.clone(), Box::new(MemoryFeedSource::new(&h.store)));

    let report = h.store.insert_report(paypal_report()).await.unwrap();

    let mut waited = 0;
    while h.notifier.messages().is_empty() && waited < 100 {
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        waited += 1;
    }
    task.abort();

    assert_eq!(h.notifier.messages().len(), 1);
    assert_eq!(h.store.tokens_for(report.id).len(), 1);
}

#[tokio::test]
async fn test_token_insert_failure_releases_claim() {
    let (h, tokens) = flaky_harness(PublishMode::Periodic);
    tokens.fail_insert.store(true, Ordering::SeqCst);
    let report = h.store.insert_report(paypal_report()).await.unwrap();

    let err = h.workflow.handle_new_report(&report).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Store(_)));
    assert!(h.notifier.messages().is_empty());
    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), ReportState::Submitted);
    assert_eq!(h.store.list_unnotified().await.unwrap().len(), 1);

    tokens.fail_insert.store(false, Ordering::SeqCst);
    let e = h.workflow.handle_new_report(&report).await.unwrap().unwrap();
    assert!(e.notified);
    assert_eq!(h.store.tokens_for(report.id).len(), 1);
    assert!(h.workflow.redeem(&e.token.token).await.is_ok());
}

#[tokio::test]
async fn test_publish_job_retries_failed_immediate_publication() {
    let h = harness(PublishMode::Immediate, None);
    h.publisher.set_failing(true);
    let report = h.store.insert_report(paypal_report()).await.unwrap();
    let token = h.workflow.handle_new_report(&report).await.unwrap().unwrap().token;
    assert!(!h.workflow.redeem(&token.token).await.unwrap().published);

    h.publisher.set_failing(false);
    let task = jobs::publisher::spawn(h.workflow.clone(), StdDuration::from_millis(10));
    let mut waited = 0;
    while h.publisher.messages().is_empty() && waited < 100 {
        tokio::time::sleep(StdDuration::from_millis(10)).await;
        waited += 1;
    }
    task.abort();

    assert_eq!(h.publisher.messages().len(), 1);
    let stored = h.store.get_report(report.id).await.unwrap().unwrap();
    assert_eq!(stored.state(), ReportState::Published);
}
