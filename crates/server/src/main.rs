use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{get_company, list_companies, ApiContext, ListCompaniesParams};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{companies_route, Company},
};
use storage::CompanyStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    let store = seed_store(&settings)?;
    for (status, count) in store.status_counts() {
        info!(%status, count, "seeded companies by status");
    }

    let api = ApiContext {
        store,
        paging: settings.paging(),
    };
    let app = build_router(Arc::new(AppState { api }), settings.cors_allow_any_origin);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn seed_store(settings: &Settings) -> anyhow::Result<CompanyStore> {
    let store = match settings.dataset_path.as_deref() {
        Some(path) => {
            let store = CompanyStore::load_json(path)?;
            info!(path, companies = store.len(), "loaded company dataset");
            store
        }
        None => {
            let store = CompanyStore::generated(settings.mock_company_count, settings.mock_seed)?;
            info!(
                companies = store.len(),
                seed = settings.mock_seed,
                "generated mock company dataset"
            );
            store
        }
    };
    if store.is_empty() {
        warn!("company store is empty; every listing will return an empty page");
    }
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>, cors_allow_any_origin: bool) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route(companies_route(), get(http_list_companies))
        .route("/api/companies/:id", get(http_get_company))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_companies(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<Vec<Company>> {
    let params = ListCompaniesParams::from_query(query.as_deref());
    Json(list_companies(&state.api, &params))
}

async fn http_get_company(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Company>, (StatusCode, Json<ApiError>)> {
    get_company(&state.api, &id)
        .map(Json)
        .map_err(|e| (status_for(&e), Json(e)))
}

fn status_for(error: &ApiError) -> StatusCode {
    match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
