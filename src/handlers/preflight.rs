use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PreflightParams {
    /// Action key to preflight against the policy service
    pub key: Option<String>,
}

/// Proxy an agent preflight check to the policy service.
///
/// Body and bearer token pass through verbatim; the upstream's decision comes
/// back with its original status code. Only a missing key is answered locally.
#[utoipa::path(
    post,
    path = "/agent/api/preflight",
    params(PreflightParams),
    responses(
        (status = 200, description = "Upstream decision, status echoed"),
        (status = 400, description = "Missing key"),
        (status = 502, description = "Policy service unreachable")
    ),
    tag = "Agent"
)]
pub async fn preflight(
    State(state): State<AppState>,
    Query(params): Query<PreflightParams>,
    headers: HeaderMap,
    body: String,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let key = match params.key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "missing key" })),
            ));
        }
    };

    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let (status, value) = state.policy.preflight(key, authorization, body).await?;
    Ok((status, Json(value)))
}
