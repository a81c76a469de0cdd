pub mod auth_config;
pub mod connector_definition;
pub mod connector_operation;
pub mod registry_connector;
pub mod tenant_connector;
