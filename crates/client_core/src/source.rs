//! Page sources: where the pager gets its companies from.
//!
//! The flat array served by `GET /api/companies` is the canonical contract.
//! The hosted classification API wraps pages in `{ body: { companies } }`
//! and is reached through [`HostedPageSource`], which unwraps the envelope
//! before the pager ever sees it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::CompanyId,
    error::ApiError,
    protocol::{
        companies_route, ClassificationRequest, ClassificationResponse, Company,
        ListCompaniesQuery,
    },
};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, query: &ListCompaniesQuery) -> Result<Vec<Company>, FetchError>;
}

fn http_client() -> Result<Client, FetchError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(FetchError::Transport)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => FetchError::Api {
                status: status.as_u16(),
                source: api_error.into(),
            },
            Err(_) => FetchError::Status {
                status: status.as_u16(),
                body,
            },
        });
    }
    response.json().await.map_err(FetchError::Decode)
}

pub struct RestPageSource {
    http: Client,
    base_url: Url,
}

impl RestPageSource {
    pub fn new(server_url: &str) -> Result<Self, FetchError> {
        Self::with_client(http_client()?, server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, FetchError> {
        let mut base_url = Url::parse(server_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, route: &str) -> Result<Url, FetchError> {
        Ok(self.base_url.join(route.trim_start_matches('/'))?)
    }

    /// Single-company lookup for the detail view; `Ok(None)` on 404.
    pub async fn company(&self, id: CompanyId) -> Result<Option<Company>, FetchError> {
        let url = self.endpoint(&format!("{}/{}", companies_route(), id))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(company_id = id.0, "company not found");
            return Ok(None);
        }
        read_json(response).await.map(Some)
    }
}

#[async_trait]
impl PageSource for RestPageSource {
    async fn fetch_page(&self, query: &ListCompaniesQuery) -> Result<Vec<Company>, FetchError> {
        let url = self.endpoint(companies_route())?;
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(FetchError::Transport)?;
        read_json(response).await
    }
}

pub struct HostedPageSource {
    http: Client,
    endpoint: Url,
}

impl HostedPageSource {
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        Self::with_client(http_client()?, endpoint)
    }

    pub fn with_client(http: Client, endpoint: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[async_trait]
impl PageSource for HostedPageSource {
    async fn fetch_page(&self, query: &ListCompaniesQuery) -> Result<Vec<Company>, FetchError> {
        let request = ClassificationRequest {
            classification: query.status.into_iter().collect(),
            limit: query.limit,
            offset: u64::from(query.page) * u64::from(query.limit),
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(FetchError::Transport)?;
        let envelope: ClassificationResponse = read_json(response).await?;
        Ok(envelope.into_companies())
    }
}
