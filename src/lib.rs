// Library crate for the connector administration service
// Exports modules for use by the server binary and tests

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_auth_config, create_connector, delete_auth_config, delete_connector, get_connector,
    list_auth_configs, list_connectors, list_enabled_actions, list_registry_connectors, preflight,
    set_action_enabled, set_tenant_connector, update_auth_config, update_connector,
    upsert_registry_connector,
};
use crate::middlewares::admin_auth_middleware;
use crate::state::AppState;

/// Build the application router with the given state
pub fn build_router(state: AppState) -> Router {
    // Admin routes (require an admin bearer token)
    let admin_routes = Router::new()
        // Custom connector routes
        .route("/admin/tenant/custom-connectors", get(list_connectors))
        .route("/admin/tenant/custom-connectors", post(create_connector))
        .route("/admin/tenant/custom-connectors/{id}", get(get_connector))
        .route("/admin/tenant/custom-connectors/{id}", put(update_connector))
        .route(
            "/admin/tenant/custom-connectors/{id}",
            delete(delete_connector),
        )
        .route(
            "/admin/tenant/custom-connectors/{id}/actions",
            get(list_enabled_actions),
        )
        .route(
            "/admin/tenant/custom-connectors/{id}/actions/{op_id}",
            put(set_action_enabled),
        )
        // Auth config routes
        .route("/admin/auth", get(list_auth_configs))
        .route("/admin/auth", post(create_auth_config))
        .route("/admin/auth/{id}", put(update_auth_config))
        .route("/admin/auth/{id}", delete(delete_auth_config))
        // Registry routes
        .route("/admin/registry/connectors", get(list_registry_connectors))
        .route(
            "/admin/registry/connectors",
            post(upsert_registry_connector),
        )
        .route(
            "/admin/tenant/connectors/{connector_id}",
            put(set_tenant_connector),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        // Agent routes (the policy service enforces authorization upstream)
        .route("/agent/api/preflight", post(preflight))
        // Admin routes
        .merge(admin_routes)
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the admin console origins configured via ADMIN_CORS_ORIGINS
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
