use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::RegistryListParams;
use crate::middlewares::TenantContext;
use crate::models::{RegistryConnector, RegistrySpec};
use crate::repositories::RegistryRepository;
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Serialize)]
pub struct RegistryListResponse {
    pub data: Vec<RegistryConnector>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetTenantConnectorRequest {
    pub enabled: bool,
    /// Secret material required by the connector; stored encrypted
    pub secrets: Option<BTreeMap<String, String>>,
}

// ============ Handlers ============

/// List registry connectors with the tenant's enablement state
#[utoipa::path(
    get,
    path = "/admin/registry/connectors",
    params(RegistryListParams),
    responses(
        (status = 200, description = "Registry listing"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Registry"
)]
pub async fn list_registry_connectors(
    ctx: TenantContext,
    State(state): State<AppState>,
    Query(params): Query<RegistryListParams>,
) -> AppResult<Json<RegistryListResponse>> {
    let connectors = RegistryRepository::list(
        &state.db,
        ctx.tenant_id,
        params.q.as_deref(),
        params.category.as_deref(),
    )
    .await?;
    let total = connectors.len() as u64;

    Ok(Json(RegistryListResponse {
        data: connectors,
        total,
    }))
}

/// Publish or replace a registry spec. Platform operators only.
#[utoipa::path(
    post,
    path = "/admin/registry/connectors",
    request_body = RegistrySpec,
    responses(
        (status = 204, description = "Spec stored"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requires platform admin role")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Registry"
)]
pub async fn upsert_registry_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(spec): Json<RegistrySpec>,
) -> AppResult<StatusCode> {
    if !ctx.is_platform_admin() {
        return Err(AppError::Forbidden);
    }
    if spec.id.trim().is_empty() {
        return Err(AppError::Validation("spec id must not be empty".to_string()));
    }

    RegistryRepository::upsert(&state.db, &spec).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enable or disable a registry connector for the calling tenant, optionally
/// supplying the secrets it requires
#[utoipa::path(
    put,
    path = "/admin/tenant/connectors/{connector_id}",
    params(
        ("connector_id" = String, Path, description = "Registry connector ID")
    ),
    request_body = SetTenantConnectorRequest,
    responses(
        (status = 204, description = "Tenant state updated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Registry connector not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Registry"
)]
pub async fn set_tenant_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(connector_id): Path<String>,
    Json(payload): Json<SetTenantConnectorRequest>,
) -> AppResult<StatusCode> {
    let ciphertext = payload
        .secrets
        .as_ref()
        .map(|s| state.secrets.encrypt_json(s))
        .transpose()?;

    RegistryRepository::set_tenant_state(
        &state.db,
        ctx.tenant_id,
        &connector_id,
        payload.enabled,
        ciphertext,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
