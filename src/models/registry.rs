use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One capability advertised by a registry connector
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Capability {
    #[serde(default, alias = "Canonical")]
    pub canonical: String,
    #[serde(default, alias = "Mode")]
    pub mode: String,
    #[serde(default, alias = "Constraints", skip_serializing_if = "Option::is_none")]
    pub constraints: Option<serde_json::Value>,
}

/// Setup requirements a tenant must satisfy before enabling a connector
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Requirements {
    #[serde(default, alias = "Secrets")]
    pub secrets: Vec<String>,
    #[serde(default, alias = "Webhooks")]
    pub webhooks: Vec<String>,
}

/// Marketplace connector spec, ingested from registry files or the upsert endpoint.
///
/// Upstream spec files exist in two field-casing conventions (`id`/`ID`,
/// `display_name`/`DisplayName`, ...). The aliases below collapse both to the
/// canonical shape at this single deserialization boundary, so nothing
/// downstream ever branches on casing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrySpec {
    #[serde(alias = "ID", alias = "Id")]
    pub id: String,
    #[serde(default, alias = "Kind")]
    pub kind: String,
    #[serde(alias = "DisplayName")]
    pub display_name: String,
    #[serde(default, alias = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "Tags")]
    pub tags: Vec<String>,
    #[serde(default, alias = "Capabilities")]
    pub capabilities: Vec<Capability>,
    #[serde(default, alias = "Requirements")]
    pub requirements: Requirements,
    #[serde(default = "default_audit_mode", alias = "AuditMode")]
    pub audit_mode: String,
}

fn default_audit_mode() -> String {
    "none".to_string()
}

impl RegistrySpec {
    /// Kind defaults to the spec id when omitted
    pub fn normalized_kind(&self) -> String {
        if self.kind.trim().is_empty() {
            self.id.clone()
        } else {
            self.kind.clone()
        }
    }
}

/// Registry listing row: the spec plus per-tenant state
#[derive(Debug, Clone, Serialize)]
pub struct RegistryConnector {
    pub id: String,
    pub kind: String,
    pub display_name: String,
    pub category: String,
    pub tags: Vec<String>,
    pub capabilities: Vec<Capability>,
    pub requirements: Requirements,
    pub audit_mode: String,
    pub enabled: bool,
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_accepts_lowercase_fields() {
        let spec: RegistrySpec = serde_json::from_str(
            r#"{"id":"shopfront","kind":"shopfront","display_name":"Shopfront","tags":["commerce"]}"#,
        )
        .unwrap();
        assert_eq!(spec.id, "shopfront");
        assert_eq!(spec.display_name, "Shopfront");
        assert_eq!(spec.audit_mode, "none");
    }

    #[test]
    fn spec_accepts_capitalized_fields() {
        let spec: RegistrySpec = serde_json::from_str(
            r#"{"ID":"ledgerly","DisplayName":"Ledgerly","Requirements":{"Secrets":["api_key"],"Webhooks":[]}}"#,
        )
        .unwrap();
        assert_eq!(spec.id, "ledgerly");
        assert_eq!(spec.display_name, "Ledgerly");
        assert_eq!(spec.requirements.secrets, vec!["api_key"]);
        // kind falls back to id when omitted
        assert_eq!(spec.normalized_kind(), "ledgerly");
    }
}
