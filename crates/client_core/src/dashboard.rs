//! Signal loop tying the viewport sentinel and filter bar to the pager.

use std::sync::Arc;

use shared::domain::CompanyStatus;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::{
    filter::FilterController,
    pager::{LoadOutcome, Pager},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSignal {
    /// The end-of-list sentinel came into view.
    SentinelVisible,
    FilterSelected(Option<CompanyStatus>),
    Retry,
}

pub struct Dashboard {
    pager: Arc<Pager>,
    filter: FilterController,
    fetch_task: Option<JoinHandle<LoadOutcome>>,
}

impl Dashboard {
    pub async fn new(pager: Arc<Pager>) -> Self {
        let filter = FilterController::new(pager.clone()).await;
        Self {
            pager,
            filter,
            fetch_task: None,
        }
    }

    pub fn pager(&self) -> &Arc<Pager> {
        &self.pager
    }

    pub fn current_filter(&self) -> Option<CompanyStatus> {
        self.filter.current()
    }

    fn fetch_outstanding(&self) -> bool {
        self.fetch_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn spawn_fetch(&mut self, retry: bool) {
        let pager = self.pager.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            if retry {
                pager.retry().await
            } else {
                pager.load_next().await
            }
        }));
    }

    /// Applies one signal. Returns `true` when a fetch was started.
    pub async fn handle(&mut self, signal: DashboardSignal) -> bool {
        match signal {
            DashboardSignal::SentinelVisible => {
                if self.fetch_outstanding() {
                    debug!("sentinel signal debounced; fetch in flight");
                    return false;
                }
                if !self.pager.can_fetch().await {
                    return false;
                }
                self.spawn_fetch(false);
                true
            }
            DashboardSignal::FilterSelected(filter) => {
                if self.filter.is_current(filter) {
                    return false;
                }
                if let Some(task) = self.fetch_task.take() {
                    task.abort();
                }
                self.filter.select(filter).await;
                self.spawn_fetch(false);
                true
            }
            DashboardSignal::Retry => {
                if self.fetch_outstanding() {
                    return false;
                }
                self.spawn_fetch(true);
                true
            }
        }
    }

    /// Waits for the outstanding fetch, if any.
    pub async fn settle(&mut self) -> Option<LoadOutcome> {
        let task = self.fetch_task.take()?;
        match task.await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                if !error.is_cancelled() {
                    warn!(%error, "page fetch task failed");
                }
                None
            }
        }
    }

    /// Consumes signals until the stream ends, then lets the last fetch finish.
    pub async fn run<S>(mut self, signals: S) -> Arc<Pager>
    where
        S: Stream<Item = DashboardSignal>,
    {
        let mut signals = std::pin::pin!(signals);
        while let Some(signal) = signals.next().await {
            self.handle(signal).await;
        }
        self.settle().await;
        self.pager
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
