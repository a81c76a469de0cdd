use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{Operation, OperationDraft};

/// A tenant-defined custom connector: base URL, optional auth binding and actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub display_name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: String,
    pub auth_ref: Option<Uuid>,
    pub enabled: bool,
    pub operations: Vec<Operation>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateConnector {
    pub display_name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: String,
    pub auth_ref: Option<Uuid>,
    pub enabled: Option<bool>,
    pub operations: Vec<OperationDraft>,
}

/// Full-replace update: structural fields plus the whole operations array.
/// Operations are never partially patched; only the per-action enabled flag
/// has its own update path.
#[derive(Debug, Deserialize)]
pub struct UpdateConnector {
    pub display_name: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub base_url: Option<String>,
    pub auth_ref: Option<Uuid>,
    pub enabled: Option<bool>,
    pub operations: Option<Vec<OperationDraft>>,
}
