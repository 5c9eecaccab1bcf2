//! Prometheus counters for workflow outcomes.
//!
//! Failures the workflow swallows (notification and publish errors) are
//! still visible here. Exposed at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

pub static REPORTS_PROCESSED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "scam_hammer_reports_processed_total",
        "Reports that received an approval token"
    )
    .expect("failed to register scam_hammer_reports_processed_total")
});

pub static BRAND_MATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "scam_hammer_brand_matches_total",
        "Brand identification outcomes by signal",
        &["matched_via"]
    )
    .expect("failed to register scam_hammer_brand_matches_total")
});

pub static NOTIFICATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "scam_hammer_notifications_total",
        "Approval notifications by result",
        &["result"]
    )
    .expect("failed to register scam_hammer_notifications_total")
});

pub static REDEMPTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "scam_hammer_token_redemptions_total",
        "Approval token redemptions by result",
        &["result"]
    )
    .expect("failed to register scam_hammer_token_redemptions_total")
});

pub static PUBLICATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "scam_hammer_publications_total",
        "Public warnings by result",
        &["result"]
    )
    .expect("failed to register scam_hammer_publications_total")
});

/// Encode all registered metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}
