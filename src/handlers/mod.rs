pub mod auth_config;
pub mod common;
pub mod connector;
pub mod preflight;
pub mod registry;

pub use auth_config::{
    create_auth_config, delete_auth_config, list_auth_configs, update_auth_config,
    AuthConfigListResponse, AuthConfigResponse, CreateAuthConfigRequest, UpdateAuthConfigRequest,
};
pub use common::{validate_required, RegistryListParams};
pub use connector::{
    create_connector, delete_connector, get_connector, list_connectors, list_enabled_actions,
    set_action_enabled, update_connector, ActionListResponse, ConnectorListResponse,
    ConnectorResponse, CreateConnectorRequest, OperationResponse, SetActionEnabledRequest,
    UpdateConnectorRequest,
};
pub use preflight::{preflight, PreflightParams};
pub use registry::{
    list_registry_connectors, set_tenant_connector, upsert_registry_connector,
    RegistryListResponse, SetTenantConnectorRequest,
};
