use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Tenant credential binding referenced by connectors via `auth_ref`.
/// Secret material is stored encrypted and never round-trips through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub auth_type: String, // api_key | bearer | oauth2_client
    pub config: serde_json::Value,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthConfig {
    pub name: String,
    pub auth_type: String,
    pub config: serde_json::Value,
    pub secrets: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAuthConfig {
    pub name: Option<String>,
    pub auth_type: Option<String>,
    pub config: Option<serde_json::Value>,
    pub secrets: Option<BTreeMap<String, String>>,
}
