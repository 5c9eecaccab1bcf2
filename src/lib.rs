//! scam-hammer library crate.
//!
//! Watches for submitted phishing reports, enriches them with the
//! impersonated brand and sender country, asks a moderator for approval
//! and publishes a public warning once approved.

pub mod analysis;
pub mod api;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod metrics;
pub mod models;
pub mod notification;
pub mod reference;
pub mod source;
pub mod store;
pub mod workflow;
