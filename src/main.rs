use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use hubwire::config::Config;
use hubwire::handlers::{
    ActionListResponse, AuthConfigListResponse, AuthConfigResponse, ConnectorListResponse,
    ConnectorResponse, CreateAuthConfigRequest, CreateConnectorRequest, OperationResponse,
    SetActionEnabledRequest, SetTenantConnectorRequest, UpdateAuthConfigRequest,
    UpdateConnectorRequest,
};
use hubwire::models::{
    Capability, OperationDraft, Parameter, RegistrySpec, RequestTemplate, Requirements,
};
use hubwire::state::AppState;
use hubwire::{build_router, handlers};

/// Security scheme for Bearer token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::connector::create_connector,
        handlers::connector::list_connectors,
        handlers::connector::get_connector,
        handlers::connector::update_connector,
        handlers::connector::delete_connector,
        handlers::connector::set_action_enabled,
        handlers::connector::list_enabled_actions,
        handlers::auth_config::create_auth_config,
        handlers::auth_config::list_auth_configs,
        handlers::auth_config::update_auth_config,
        handlers::auth_config::delete_auth_config,
        handlers::registry::list_registry_connectors,
        handlers::registry::upsert_registry_connector,
        handlers::registry::set_tenant_connector,
        handlers::preflight::preflight,
    ),
    components(schemas(
        CreateConnectorRequest,
        UpdateConnectorRequest,
        SetActionEnabledRequest,
        ConnectorResponse,
        ConnectorListResponse,
        OperationResponse,
        ActionListResponse,
        OperationDraft,
        Parameter,
        RequestTemplate,
        CreateAuthConfigRequest,
        UpdateAuthConfigRequest,
        AuthConfigResponse,
        AuthConfigListResponse,
        RegistrySpec,
        Capability,
        Requirements,
        SetTenantConnectorRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Custom Connectors", description = "Tenant-defined connector management"),
        (name = "Auth Configs", description = "Tenant credential bindings"),
        (name = "Registry", description = "Marketplace connector registry"),
        (name = "Agent", description = "Agent-facing proxy endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (connects to the database, runs migrations)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Database connection established");

    // Seed the registry from disk when a spec directory is configured
    match state.import_registry().await {
        Ok(0) => {}
        Ok(n) => tracing::info!(count = n, "Imported registry connector specs"),
        Err(e) => tracing::warn!(error = %e, "Registry import failed"),
    }

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}
