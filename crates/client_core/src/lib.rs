//! Client side of the company listing: page sources, the infinite-scroll
//! pager, the status filter, and the signal loop that drives them.

pub mod dashboard;
pub mod display;
pub mod error;
pub mod filter;
pub mod pager;
pub mod retry;
pub mod source;

pub use dashboard::{Dashboard, DashboardSignal};
pub use error::FetchError;
pub use filter::FilterController;
pub use pager::{LoadOutcome, Pager, PagerConfig, PagerEvent, PagerSnapshot, SuppressReason};
pub use retry::RetryPolicy;
pub use source::{HostedPageSource, PageSource, RestPageSource};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
