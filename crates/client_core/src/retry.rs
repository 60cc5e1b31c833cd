use std::time::Duration;

use shared::protocol::{Company, ListCompaniesQuery};
use tokio::time::sleep;
use tracing::warn;

use crate::{error::FetchError, source::PageSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(16))
            .min(self.max_delay)
    }
}

pub async fn fetch_with_retry<S>(
    source: &S,
    query: &ListCompaniesQuery,
    policy: RetryPolicy,
) -> Result<Vec<Company>, FetchError>
where
    S: PageSource + ?Sized,
{
    let mut attempt = 0;
    loop {
        match source.fetch_page(query).await {
            Ok(companies) => return Ok(companies),
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    page = query.page,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "page fetch failed; retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
