use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::validate_required;
use crate::middlewares::TenantContext;
use crate::models::{AuthConfig, CreateAuthConfig, UpdateAuthConfig};
use crate::repositories::{AuthConfigRepository, TenantRepository};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAuthConfigRequest {
    pub name: String,
    /// api_key | bearer | oauth2_client
    pub auth_type: String,
    #[serde(default)]
    pub config: serde_json::Value,
    /// Secret material; stored encrypted, never returned
    pub secrets: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAuthConfigRequest {
    pub name: Option<String>,
    pub auth_type: Option<String>,
    pub config: Option<serde_json::Value>,
    pub secrets: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthConfigResponse {
    pub id: Uuid,
    pub name: String,
    pub auth_type: String,
    pub config: serde_json::Value,
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl From<AuthConfig> for AuthConfigResponse {
    fn from(a: AuthConfig) -> Self {
        Self {
            id: a.id,
            name: a.name,
            auth_type: a.auth_type,
            config: a.config,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthConfigListResponse {
    pub data: Vec<AuthConfigResponse>,
    pub total: u64,
}

// ============ Handlers ============

/// Create a credential binding
#[utoipa::path(
    post,
    path = "/admin/auth",
    request_body = CreateAuthConfigRequest,
    responses(
        (status = 201, description = "Auth config created", body = AuthConfigResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth Configs"
)]
pub async fn create_auth_config(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(payload): Json<CreateAuthConfigRequest>,
) -> AppResult<(StatusCode, Json<AuthConfigResponse>)> {
    validate_required(&payload.name, "name")?;
    validate_required(&payload.auth_type, "auth_type")?;

    let ciphertext = payload
        .secrets
        .as_ref()
        .map(|s| state.secrets.encrypt_json(s))
        .transpose()?;

    let create = CreateAuthConfig {
        name: payload.name,
        auth_type: payload.auth_type,
        config: payload.config,
        secrets: payload.secrets,
    };

    let auth_config =
        AuthConfigRepository::create(&state.db, ctx.tenant_id, &create, ciphertext).await?;
    Ok((StatusCode::CREATED, Json(auth_config.into())))
}

/// List the tenant's credential bindings. Secret material is never included.
#[utoipa::path(
    get,
    path = "/admin/auth",
    responses(
        (status = 200, description = "List of auth configs", body = AuthConfigListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth Configs"
)]
pub async fn list_auth_configs(
    ctx: TenantContext,
    State(state): State<AppState>,
) -> AppResult<Json<AuthConfigListResponse>> {
    let configs = AuthConfigRepository::list(&state.db, ctx.tenant_id).await?;
    let total = AuthConfigRepository::count(&state.db, ctx.tenant_id).await?;

    Ok(Json(AuthConfigListResponse {
        data: configs.into_iter().map(|a| a.into()).collect(),
        total,
    }))
}

/// Update a credential binding. Omitting secrets keeps the stored material.
#[utoipa::path(
    put,
    path = "/admin/auth/{id}",
    params(
        ("id" = Uuid, Path, description = "Auth config ID")
    ),
    request_body = UpdateAuthConfigRequest,
    responses(
        (status = 200, description = "Auth config updated", body = AuthConfigResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Auth config not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth Configs"
)]
pub async fn update_auth_config(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAuthConfigRequest>,
) -> AppResult<Json<AuthConfigResponse>> {
    if let Some(name) = &payload.name {
        validate_required(name, "name")?;
    }

    let ciphertext = payload
        .secrets
        .as_ref()
        .map(|s| state.secrets.encrypt_json(s))
        .transpose()?;

    let update = UpdateAuthConfig {
        name: payload.name,
        auth_type: payload.auth_type,
        config: payload.config,
        secrets: payload.secrets,
    };

    let auth_config =
        AuthConfigRepository::update(&state.db, ctx.tenant_id, id, &update, ciphertext).await?;
    Ok(Json(auth_config.into()))
}

/// Delete a credential binding
#[utoipa::path(
    delete,
    path = "/admin/auth/{id}",
    params(
        ("id" = Uuid, Path, description = "Auth config ID")
    ),
    responses(
        (status = 204, description = "Auth config deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Auth config not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth Configs"
)]
pub async fn delete_auth_config(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    AuthConfigRepository::delete(&state.db, ctx.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
