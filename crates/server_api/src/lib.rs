use shared::{
    domain::{CompanyId, StatusFilter},
    error::ApiError,
    protocol::Company,
};
use storage::CompanyStore;
use tracing::debug;
use url::form_urlencoded;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub use shared::protocol::MAX_PAGE_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub store: CompanyStore,
    pub paging: PagingConfig,
}

/// Raw query parameters of the listing route.
///
/// Kept as strings so that malformed numbers reach [`PageRequest::from_params`]
/// instead of being rejected by an extractor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListCompaniesParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

impl ListCompaniesParams {
    /// Reads each parameter on its own from a raw query string.
    ///
    /// A repeated key keeps its first value and unknown keys are ignored, so
    /// one bad parameter never discards the others.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "status" => &mut params.status,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u32,
    pub filter: StatusFilter,
}

impl PageRequest {
    pub fn from_params(params: &ListCompaniesParams, paging: PagingConfig) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        let max_limit = paging.max_limit.max(1);
        let limit = params
            .limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(paging.default_limit)
            .clamp(1, max_limit);
        let filter = StatusFilter::from_query(params.status.as_deref());
        Self {
            page,
            limit,
            filter,
        }
    }

    pub fn offset(&self) -> usize {
        let offset = self.page.saturating_mul(u64::from(self.limit));
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}

pub fn list_companies(ctx: &ApiContext, params: &ListCompaniesParams) -> Vec<Company> {
    let request = PageRequest::from_params(params, ctx.paging);
    let companies = ctx
        .store
        .list_companies(request.offset(), request.limit as usize, &request.filter);
    debug!(
        page = request.page,
        limit = request.limit,
        filter = ?request.filter,
        returned = companies.len(),
        "listed companies"
    );
    companies
}

pub fn get_company(ctx: &ApiContext, raw_id: &str) -> Result<Company, ApiError> {
    raw_id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| ctx.store.company_by_id(CompanyId(id)))
        .ok_or_else(ApiError::company_not_found)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
