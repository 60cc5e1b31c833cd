//! Infinite-scroll pagination over a [`PageSource`].
//!
//! [`PagerState`] is the synchronous state machine; [`Pager`] drives it
//! against a page source without holding the state lock across a fetch.

use std::sync::Arc;

use shared::{
    domain::CompanyStatus,
    protocol::{Company, ListCompaniesQuery, MAX_PAGE_LIMIT},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    retry::{fetch_with_retry, RetryPolicy},
    source::PageSource,
};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// `page_limit` is cut to [`MAX_PAGE_LIMIT`]: the server never returns more,
/// and a page shorter than the requested limit ends pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    pub page_limit: u32,
    pub retry: RetryPolicy,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            retry: RetryPolicy::default(),
        }
    }
}

/// A request issued by the pager, tagged with the filter epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    epoch: u64,
    query: ListCompaniesQuery,
}

impl PageTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn query(&self) -> &ListCompaniesQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    InFlight,
    Exhausted,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { page: u32, count: usize, has_more: bool },
    Suppressed(SuppressReason),
    /// The response belonged to an epoch that has since been reset.
    Stale { epoch: u64 },
    Failed { page: u32, message: String },
}

#[derive(Debug, Clone)]
pub enum PagerEvent {
    Reset {
        epoch: u64,
        filter: Option<CompanyStatus>,
    },
    PageAppended {
        epoch: u64,
        page: u32,
        companies: Vec<Company>,
    },
    Exhausted {
        epoch: u64,
        total: usize,
    },
    LoadFailed {
        epoch: u64,
        page: u32,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerSnapshot {
    pub epoch: u64,
    pub filter: Option<CompanyStatus>,
    pub companies: Vec<Company>,
    pub page_count: usize,
    pub cursor: u32,
    pub has_more: bool,
    pub in_flight: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct PagerState {
    limit: u32,
    filter: Option<CompanyStatus>,
    epoch: u64,
    pages: Vec<Vec<Company>>,
    cursor: u32,
    has_more: bool,
    in_flight: bool,
    error: Option<String>,
}

impl PagerState {
    pub fn new(limit: u32, filter: Option<CompanyStatus>) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            filter,
            epoch: 0,
            pages: Vec::new(),
            cursor: 0,
            has_more: true,
            in_flight: false,
            error: None,
        }
    }

    pub fn can_fetch(&self) -> bool {
        self.begin_check().is_ok()
    }

    fn begin_check(&self) -> Result<(), SuppressReason> {
        if self.in_flight {
            Err(SuppressReason::InFlight)
        } else if self.error.is_some() {
            Err(SuppressReason::Errored)
        } else if !self.has_more {
            Err(SuppressReason::Exhausted)
        } else {
            Ok(())
        }
    }

    /// Claims the in-flight slot and returns the request for the cursor page.
    pub fn begin_fetch(&mut self) -> Result<PageTicket, SuppressReason> {
        self.begin_check()?;
        self.in_flight = true;
        Ok(PageTicket {
            epoch: self.epoch,
            query: ListCompaniesQuery {
                page: self.cursor,
                limit: self.limit,
                status: self.filter,
            },
        })
    }

    pub fn complete(
        &mut self,
        ticket: &PageTicket,
        result: Result<Vec<Company>, FetchError>,
    ) -> LoadOutcome {
        if ticket.epoch != self.epoch {
            return LoadOutcome::Stale {
                epoch: ticket.epoch,
            };
        }
        self.in_flight = false;

        let page = ticket.query.page;
        match result {
            Ok(companies) => {
                let count = companies.len();
                self.has_more = count >= self.limit as usize;
                if count > 0 {
                    self.pages.push(companies);
                }
                self.cursor = page + 1;
                LoadOutcome::Appended {
                    page,
                    count,
                    has_more: self.has_more,
                }
            }
            Err(err) => {
                let message = err.to_string();
                self.error = Some(message.clone());
                LoadOutcome::Failed { page, message }
            }
        }
    }

    /// Starts a new epoch under `filter`, dropping everything fetched so far.
    pub fn reset(&mut self, filter: Option<CompanyStatus>) -> u64 {
        self.epoch += 1;
        self.filter = filter;
        self.pages.clear();
        self.cursor = 0;
        self.has_more = true;
        self.in_flight = false;
        self.error = None;
        self.epoch
    }

    pub fn clear_error(&mut self) -> bool {
        self.error.take().is_some()
    }

    pub fn companies(&self) -> impl Iterator<Item = &Company> {
        self.pages.iter().flatten()
    }

    pub fn last_page(&self) -> Option<&[Company]> {
        self.pages.last().map(Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn filter(&self) -> Option<CompanyStatus> {
        self.filter
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        PagerSnapshot {
            epoch: self.epoch,
            filter: self.filter,
            companies: self.companies().cloned().collect(),
            page_count: self.pages.len(),
            cursor: self.cursor,
            has_more: self.has_more,
            in_flight: self.in_flight,
            error: self.error.clone(),
        }
    }
}

pub struct Pager {
    source: Arc<dyn PageSource>,
    retry: RetryPolicy,
    state: Mutex<PagerState>,
    events: broadcast::Sender<PagerEvent>,
}

impl Pager {
    pub fn new(source: Arc<dyn PageSource>, config: PagerConfig) -> Arc<Self> {
        Self::with_filter(source, config, None)
    }

    pub fn with_filter(
        source: Arc<dyn PageSource>,
        config: PagerConfig,
        filter: Option<CompanyStatus>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            source,
            retry: config.retry,
            state: Mutex::new(PagerState::new(config.page_limit, filter)),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PagerEvent> {
        self.events.subscribe()
    }

    pub async fn can_fetch(&self) -> bool {
        self.state.lock().await.can_fetch()
    }

    pub async fn snapshot(&self) -> PagerSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn filter(&self) -> Option<CompanyStatus> {
        self.state.lock().await.filter()
    }

    /// Fetches the page under the cursor unless a fetch is already in flight,
    /// the filter is exhausted, or a terminal error is pending.
    pub async fn load_next(&self) -> LoadOutcome {
        let ticket = match self.state.lock().await.begin_fetch() {
            Ok(ticket) => ticket,
            Err(reason) => {
                debug!(?reason, "page fetch suppressed");
                return LoadOutcome::Suppressed(reason);
            }
        };
        debug!(
            epoch = ticket.epoch,
            page = ticket.query.page,
            status = ?ticket.query.status,
            "fetching page"
        );

        let result = fetch_with_retry(self.source.as_ref(), &ticket.query, self.retry).await;

        let mut state = self.state.lock().await;
        let outcome = state.complete(&ticket, result);
        match &outcome {
            LoadOutcome::Appended {
                page,
                count,
                has_more,
            } => {
                // Empty pages are not stored, so the last page is only ours when non-empty.
                let companies = match state.last_page() {
                    Some(last) if *count > 0 => last.to_vec(),
                    _ => Vec::new(),
                };
                let _ = self.events.send(PagerEvent::PageAppended {
                    epoch: ticket.epoch,
                    page: *page,
                    companies,
                });
                if !has_more {
                    info!(
                        epoch = ticket.epoch,
                        total = state.total(),
                        "reached end of company listing"
                    );
                    let _ = self.events.send(PagerEvent::Exhausted {
                        epoch: ticket.epoch,
                        total: state.total(),
                    });
                }
            }
            LoadOutcome::Failed { page, message } => {
                warn!(epoch = ticket.epoch, page, error = %message, "page fetch failed");
                let _ = self.events.send(PagerEvent::LoadFailed {
                    epoch: ticket.epoch,
                    page: *page,
                    message: message.clone(),
                });
            }
            LoadOutcome::Stale { epoch } => {
                debug!(
                    epoch,
                    current = state.epoch(),
                    "dropped response from previous filter"
                );
            }
            LoadOutcome::Suppressed(_) => {}
        }
        outcome
    }

    pub async fn reset(&self, filter: Option<CompanyStatus>) -> u64 {
        let epoch = self.state.lock().await.reset(filter);
        info!(epoch, ?filter, "company listing reset");
        let _ = self.events.send(PagerEvent::Reset { epoch, filter });
        epoch
    }

    /// Clears a terminal error and re-issues the page under the cursor.
    pub async fn retry(&self) -> LoadOutcome {
        if self.state.lock().await.clear_error() {
            debug!("retrying after failed page fetch");
        }
        self.load_next().await
    }
}

#[cfg(test)]
#[path = "tests/pager_tests.rs"]
mod tests;
