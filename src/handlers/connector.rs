use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::validate_required;
use crate::middlewares::TenantContext;
use crate::models::{
    Connector, CreateConnector, Operation, OperationDraft, Parameter, RequestTemplate,
    UpdateConnector,
};
use crate::repositories::{ConnectorRepository, TenantRepository};
use crate::services::{build_request_template, ensure_path_params};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateConnectorRequest {
    pub display_name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: String,
    pub auth_ref: Option<Uuid>,
    pub enabled: Option<bool>,
    #[serde(default)]
    pub operations: Vec<OperationDraft>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateConnectorRequest {
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: Option<String>,
    pub auth_ref: Option<Uuid>,
    pub enabled: Option<bool>,
    pub operations: Option<Vec<OperationDraft>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActionEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperationResponse {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub scopes: Vec<String>,
    pub params: Vec<Parameter>,
    pub request_tmpl: RequestTemplate,
    pub enabled: bool,
}

impl From<Operation> for OperationResponse {
    fn from(op: Operation) -> Self {
        Self {
            id: op.id,
            method: op.method,
            path: op.path,
            title: op.title,
            summary: op.summary,
            scopes: op.scopes,
            params: op.params,
            request_tmpl: op.request_tmpl,
            enabled: op.enabled,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectorResponse {
    pub id: Uuid,
    pub display_name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: String,
    pub auth_ref: Option<Uuid>,
    pub enabled: bool,
    pub operations: Vec<OperationResponse>,
    #[schema(value_type = String)]
    pub created_at: time::OffsetDateTime,
    #[schema(value_type = String)]
    pub updated_at: time::OffsetDateTime,
}

impl From<Connector> for ConnectorResponse {
    fn from(c: Connector) -> Self {
        Self {
            id: c.id,
            display_name: c.display_name,
            title: c.title,
            summary: c.summary,
            base_url: c.base_url,
            auth_ref: c.auth_ref,
            enabled: c.enabled,
            operations: c.operations.into_iter().map(|o| o.into()).collect(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectorListResponse {
    pub data: Vec<ConnectorResponse>,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActionListResponse {
    pub data: Vec<OperationResponse>,
}

// ============ Draft reconciliation ============

/// Normalize submitted operations before persisting: validate the method,
/// synthesize path parameters for every placeholder, and fill in the request
/// template when the console did not supply one. A supplied template is
/// persisted verbatim.
fn reconcile_drafts(drafts: Vec<OperationDraft>) -> AppResult<Vec<OperationDraft>> {
    let mut out = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let method = draft
            .normalized_method()
            .map_err(AppError::Validation)?;

        let mut draft = ensure_path_params(&draft);
        draft.method = method;
        if draft.request_tmpl.is_none() {
            draft.request_tmpl = Some(build_request_template(&draft));
        }
        out.push(draft);
    }
    Ok(out)
}

// ============ Handlers ============

/// Create a custom connector with its actions
#[utoipa::path(
    post,
    path = "/admin/tenant/custom-connectors",
    request_body = CreateConnectorRequest,
    responses(
        (status = 201, description = "Connector created", body = ConnectorResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn create_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Json(payload): Json<CreateConnectorRequest>,
) -> AppResult<(StatusCode, Json<ConnectorResponse>)> {
    validate_required(&payload.display_name, "display_name")?;
    validate_required(&payload.base_url, "base_url")?;

    let create = CreateConnector {
        display_name: payload.display_name,
        title: payload.title,
        summary: payload.summary,
        base_url: payload.base_url,
        auth_ref: payload.auth_ref,
        enabled: payload.enabled,
        operations: reconcile_drafts(payload.operations)?,
    };

    let connector = ConnectorRepository::create(&state.db, ctx.tenant_id, &create).await?;
    Ok((StatusCode::CREATED, Json(connector.into())))
}

/// List the tenant's custom connectors
#[utoipa::path(
    get,
    path = "/admin/tenant/custom-connectors",
    responses(
        (status = 200, description = "List of connectors", body = ConnectorListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn list_connectors(
    ctx: TenantContext,
    State(state): State<AppState>,
) -> AppResult<Json<ConnectorListResponse>> {
    let connectors = ConnectorRepository::list(&state.db, ctx.tenant_id).await?;
    let total = ConnectorRepository::count(&state.db, ctx.tenant_id).await?;

    Ok(Json(ConnectorListResponse {
        data: connectors.into_iter().map(|c| c.into()).collect(),
        total,
    }))
}

/// Get a custom connector by ID
#[utoipa::path(
    get,
    path = "/admin/tenant/custom-connectors/{id}",
    params(
        ("id" = Uuid, Path, description = "Connector ID")
    ),
    responses(
        (status = 200, description = "Connector details", body = ConnectorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connector not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn get_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ConnectorResponse>> {
    let connector = ConnectorRepository::find_with_operations(&state.db, ctx.tenant_id, id).await?;
    Ok(Json(connector.into()))
}

/// Update a custom connector. A supplied operations array replaces the
/// existing set wholesale.
#[utoipa::path(
    put,
    path = "/admin/tenant/custom-connectors/{id}",
    params(
        ("id" = Uuid, Path, description = "Connector ID")
    ),
    request_body = UpdateConnectorRequest,
    responses(
        (status = 200, description = "Connector updated", body = ConnectorResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connector not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn update_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateConnectorRequest>,
) -> AppResult<Json<ConnectorResponse>> {
    if let Some(display_name) = &payload.display_name {
        validate_required(display_name, "display_name")?;
    }
    if let Some(base_url) = &payload.base_url {
        validate_required(base_url, "base_url")?;
    }

    let update = UpdateConnector {
        display_name: payload.display_name,
        title: payload.title,
        summary: payload.summary,
        base_url: payload.base_url,
        auth_ref: payload.auth_ref,
        enabled: payload.enabled,
        operations: payload.operations.map(reconcile_drafts).transpose()?,
    };

    let connector = ConnectorRepository::update(&state.db, ctx.tenant_id, id, &update).await?;
    Ok(Json(connector.into()))
}

/// Delete a custom connector and its actions
#[utoipa::path(
    delete,
    path = "/admin/tenant/custom-connectors/{id}",
    params(
        ("id" = Uuid, Path, description = "Connector ID")
    ),
    responses(
        (status = 204, description = "Connector deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connector not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn delete_connector(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ConnectorRepository::delete(&state.db, ctx.tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle a single action. Only the enabled flag can change here; action
/// definitions are edited through the connector update.
#[utoipa::path(
    put,
    path = "/admin/tenant/custom-connectors/{id}/actions/{op_id}",
    params(
        ("id" = Uuid, Path, description = "Connector ID"),
        ("op_id" = Uuid, Path, description = "Action ID")
    ),
    request_body = SetActionEnabledRequest,
    responses(
        (status = 204, description = "Action flag updated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connector or action not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn set_action_enabled(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path((id, op_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetActionEnabledRequest>,
) -> AppResult<StatusCode> {
    ConnectorRepository::set_operation_enabled(&state.db, ctx.tenant_id, id, op_id, payload.enabled)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a connector's enabled actions
#[utoipa::path(
    get,
    path = "/admin/tenant/custom-connectors/{id}/actions",
    params(
        ("id" = Uuid, Path, description = "Connector ID")
    ),
    responses(
        (status = 200, description = "Enabled actions", body = ActionListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Connector not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Custom Connectors"
)]
pub async fn list_enabled_actions(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ActionListResponse>> {
    let connector = ConnectorRepository::find_with_operations(&state.db, ctx.tenant_id, id).await?;

    Ok(Json(ActionListResponse {
        data: connector
            .operations
            .into_iter()
            .filter(|op| op.enabled)
            .map(|op| op.into())
            .collect(),
    }))
}
