use std::{
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{CompanyStatus, StatusFilter},
    protocol::{Company, ListCompaniesQuery},
};
use storage::{generate_companies, CompanyStore};
use tokio::sync::Semaphore;

use crate::{error::FetchError, retry::RetryPolicy, source::PageSource};

/// In-process page source over a [`CompanyStore`].
///
/// Optionally holds every fetch until a permit is released, and can fail a
/// number of leading calls with a given HTTP status.
pub(crate) struct StoreSource {
    store: CompanyStore,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
    failures_left: AtomicUsize,
    failure_status: u16,
}

impl StoreSource {
    pub(crate) fn new(store: CompanyStore) -> Arc<Self> {
        Arc::new(Self::build(store, None, 0, 500))
    }

    pub(crate) fn gated(store: CompanyStore) -> Arc<Self> {
        Arc::new(Self::build(store, Some(Semaphore::new(0)), 0, 500))
    }

    pub(crate) fn failing_first(store: CompanyStore, failures: usize, status: u16) -> Arc<Self> {
        Arc::new(Self::build(store, None, failures, status))
    }

    fn build(store: CompanyStore, gate: Option<Semaphore>, failures: usize, status: u16) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
            gate,
            failures_left: AtomicUsize::new(failures),
            failure_status: status,
        }
    }

    pub(crate) fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for StoreSource {
    async fn fetch_page(&self, query: &ListCompaniesQuery) -> Result<Vec<Company>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FetchError::Status {
                status: self.failure_status,
                body: "scripted failure".to_string(),
            });
        }
        let filter = StatusFilter::from(query.status);
        let offset = query.page as usize * query.limit as usize;
        Ok(self
            .store
            .list_companies(offset, query.limit as usize, &filter))
    }
}

pub(crate) fn uniform_store(count: usize, status: CompanyStatus) -> CompanyStore {
    let companies = generate_companies(count, 1)
        .into_iter()
        .map(|mut company| {
            company.status = status;
            company
        })
        .collect();
    CompanyStore::from_records(companies).expect("store")
}

pub(crate) fn mixed_store() -> CompanyStore {
    CompanyStore::generated(50, 42).expect("store")
}

pub(crate) fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    }
}

pub(crate) async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check().await {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
