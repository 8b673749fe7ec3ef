use application::TallyReportQuery;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, Uri},
    response::Json,
    routing::{get, post},
};
use domain::{InventoryHostFacts, NormalizedFacts, TagMetaData, TagMetric, TallyReport, Uom};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's account number
pub const ACCOUNT_HEADER: &str = "x-account-number";

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/tally/products/{product_id}", get(get_tally_report))
        .route("/api/v1/registry/tags/{tag}/metrics", get(get_tag_metrics))
        .route("/api/v1/facts/normalize", post(normalize_facts))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_tally_report(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<TallyReportQuery>,
) -> Result<Json<TallyReport>, ApiError> {
    let account_number = headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingAccount)?;
    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let report = state
        .report_service
        .get_tally_report(account_number, &product_id, &query, request_uri)
        .await?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TagMetricsResponse {
    tag: String,
    uoms: BTreeSet<Uom>,
    metrics: Vec<TagMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<TagMetaData>,
}

async fn get_tag_metrics(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> Result<Json<TagMetricsResponse>, ApiError> {
    let profile = &state.tag_profile;
    let uoms = profile.supported_metrics_for_product(&tag)?;
    let metrics = uoms
        .iter()
        .filter_map(|uom| profile.tag_metric(&tag, *uom))
        .cloned()
        .collect();
    let metadata = profile.primary_tag_metadata(&tag).cloned();

    Ok(Json(TagMetricsResponse {
        tag,
        uoms,
        metrics,
        metadata,
    }))
}

async fn normalize_facts(
    State(state): State<Arc<AppState>>,
    Json(host): Json<InventoryHostFacts>,
) -> Json<NormalizedFacts> {
    let normalized = state.normalizer.normalize(&host);
    debug!(
        system = %host.system_name,
        products = normalized.products.len(),
        excluded = normalized.is_excluded(),
        "Host facts normalized"
    );
    Json(normalized)
}
