use std::sync::Arc;

use shared::domain::CompanyStatus;
use tracing::debug;

use crate::pager::Pager;

/// Owns the active status filter; `None` shows every company.
///
/// Changing the filter resets the pager into a new epoch so that pages
/// fetched under the previous filter can never be merged with new ones.
pub struct FilterController {
    pager: Arc<Pager>,
    current: Option<CompanyStatus>,
}

impl FilterController {
    pub async fn new(pager: Arc<Pager>) -> Self {
        let current = pager.filter().await;
        Self { pager, current }
    }

    pub fn current(&self) -> Option<CompanyStatus> {
        self.current
    }

    pub fn is_current(&self, filter: Option<CompanyStatus>) -> bool {
        self.current == filter
    }

    /// Returns the new epoch, or `None` when `filter` is already active.
    pub async fn select(&mut self, filter: Option<CompanyStatus>) -> Option<u64> {
        if self.is_current(filter) {
            debug!(?filter, "filter unchanged");
            return None;
        }
        self.current = filter;
        Some(self.pager.reset(filter).await)
    }
}
