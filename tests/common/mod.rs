#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;

use scam_hammer::analysis::TitleFetcher;
use scam_hammer::models::token::ApprovalToken;
use scam_hammer::notification::{NotifyError, Notifier, PublishError, Publisher};
use scam_hammer::store::memory::MemoryStore;
use scam_hammer::store::TokenStore;
use scam_hammer::workflow::{PublishMode, Workflow, WorkflowConfig};

pub const BASE_URL: &str = "https://scam-hammer.test";

/// Returns a fixed title and counts calls.
#[derive(Default)]
pub struct StubFetcher {
    pub title: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl TitleFetcher for StubFetcher {
    async fn fetch_title(&self, url: &str) -> Option<String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.title.clone()
    }
}

/// Records every message; fails while `fail` is set.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingSink {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Rejected {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl Publisher for RecordingSink {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Rejected {
                status: 503,
                body: "over capacity".into(),
            });
        }
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Delegates to a [`MemoryStore`] unless told to fail.
pub struct FlakyTokens {
    pub inner: MemoryStore,
    pub fail_insert: AtomicBool,
    pub fail_consume: AtomicBool,
}

impl FlakyTokens {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_insert: AtomicBool::new(false),
            fail_consume: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl TokenStore for FlakyTokens {
    async fn insert_token(&self, token: &ApprovalToken) -> anyhow::Result<()> {
        if self.fail_insert.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        self.inner.insert_token(token).await
    }

    async fn consume_token(&self, value: &str) -> anyhow::Result<Option<ApprovalToken>> {
        if self.fail_consume.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset");
        }
        self.inner.consume_token(value).await
    }

    async fn delete_expired_tokens(&self) -> anyhow::Result<u64> {
        self.inner.delete_expired_tokens().await
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub fetcher: Arc<StubFetcher>,
    pub notifier: Arc<RecordingSink>,
    pub publisher: Arc<RecordingSink>,
    pub workflow: Arc<Workflow>,
}

pub fn harness(mode: PublishMode, page_title: Option<&str>) -> Harness {
    let store = MemoryStore::new();
    build(store.clone(), Arc::new(store), mode, page_title)
}

/// Harness whose token store can be switched into failure.
pub fn flaky_harness(mode: PublishMode) -> (Harness, Arc<FlakyTokens>) {
    let store = MemoryStore::new();
    let tokens = Arc::new(FlakyTokens::new(store.clone()));
    (build(store, tokens.clone(), mode, None), tokens)
}

fn build(
    store: MemoryStore,
    tokens: Arc<dyn TokenStore>,
    mode: PublishMode,
    page_title: Option<&str>,
) -> Harness {
    let fetcher = Arc::new(StubFetcher {
        title: page_title.map(String::from),
        ..Default::default()
    });
    let notifier = Arc::new(RecordingSink::default());
    let publisher = Arc::new(RecordingSink::default());

    let workflow = Arc::new(Workflow::new(
        Arc::new(store.clone()),
        tokens,
        fetcher.clone(),
        notifier.clone(),
        publisher.clone(),
        WorkflowConfig {
            public_base_url: BASE_URL.to_string(),
            token_ttl: Duration::minutes(15),
            publish_mode: mode,
            fetch_titles: true,
        },
    ));

    Harness {
        store,
        fetcher,
        notifier,
        publisher,
        workflow,
    }
}
