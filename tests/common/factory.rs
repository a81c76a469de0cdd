use std::collections::BTreeMap;

use uuid::Uuid;

use hubwire::models::{
    AuthConfig, Connector, CreateAuthConfig, CreateConnector, OperationDraft, Parameter,
    RegistrySpec,
};
use hubwire::repositories::{AuthConfigRepository, ConnectorRepository, RegistryRepository};
use hubwire::services::{
    build_request_template, ensure_path_params, AuthService, ROLE_PLATFORM_ADMIN,
    ROLE_TENANT_ADMIN,
};
use hubwire::state::AppState;

/// Authentication info for tests
#[allow(dead_code)]
pub struct TestAuth {
    pub tenant_id: Uuid,
    pub token: String,
}

impl TestAuth {
    /// Get the Authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Mint a tenant admin token for a fresh tenant
    pub fn tenant_admin(&self) -> TestAuth {
        self.auth_with_role(ROLE_TENANT_ADMIN)
    }

    /// Mint a platform admin token for a fresh tenant
    pub fn platform_admin(&self) -> TestAuth {
        self.auth_with_role(ROLE_PLATFORM_ADMIN)
    }

    fn auth_with_role(&self, role: &str) -> TestAuth {
        let tenant_id = Uuid::new_v4();
        let token = AuthService::generate_token(tenant_id, "ops@example.com", role, &self.state.config)
            .unwrap();

        TestAuth { tenant_id, token }
    }

    /// Create a connector with a single GET action carrying one path placeholder
    pub async fn create_connector(&self, tenant_id: Uuid) -> Connector {
        let draft = OperationDraft {
            method: "GET".to_string(),
            path: "/orders/{order_id}".to_string(),
            title: Some("Get order".to_string()),
            scopes: vec!["orders:read".to_string()],
            ..Default::default()
        };
        let mut draft = ensure_path_params(&draft);
        draft.request_tmpl = Some(build_request_template(&draft));

        let input = CreateConnector {
            display_name: format!("Test Connector {}", Uuid::new_v4()),
            title: None,
            summary: None,
            base_url: "https://api.example.com".to_string(),
            auth_ref: None,
            enabled: Some(true),
            operations: vec![draft],
        };

        ConnectorRepository::create(&self.state.db, tenant_id, &input)
            .await
            .unwrap()
    }

    /// Create a connector with a caller-supplied operations array
    pub async fn create_connector_with_operations(
        &self,
        tenant_id: Uuid,
        operations: Vec<OperationDraft>,
    ) -> Connector {
        let operations = operations
            .into_iter()
            .map(|draft| {
                let mut draft = ensure_path_params(&draft);
                if draft.request_tmpl.is_none() {
                    draft.request_tmpl = Some(build_request_template(&draft));
                }
                draft
            })
            .collect();

        let input = CreateConnector {
            display_name: format!("Test Connector {}", Uuid::new_v4()),
            title: None,
            summary: None,
            base_url: "https://api.example.com".to_string(),
            auth_ref: None,
            enabled: Some(true),
            operations,
        };

        ConnectorRepository::create(&self.state.db, tenant_id, &input)
            .await
            .unwrap()
    }

    /// Create a header parameter draft
    pub fn header_param(name: &str) -> Parameter {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "location": "header"
        }))
        .unwrap()
    }

    /// Create an auth config with encrypted secrets
    pub async fn create_auth_config(&self, tenant_id: Uuid) -> AuthConfig {
        let secrets = BTreeMap::from([("api_key".to_string(), "shhh".to_string())]);
        let input = CreateAuthConfig {
            name: format!("creds-{}", Uuid::new_v4()),
            auth_type: "api_key".to_string(),
            config: serde_json::json!({ "header": "X-Api-Key" }),
            secrets: Some(secrets.clone()),
        };

        let ciphertext = self.state.secrets.encrypt_json(&secrets).unwrap();
        AuthConfigRepository::create(&self.state.db, tenant_id, &input, Some(ciphertext))
            .await
            .unwrap()
    }

    /// Publish a registry spec
    pub async fn publish_registry_spec(&self, id: &str, category: &str) -> RegistrySpec {
        let spec: RegistrySpec = serde_json::from_value(serde_json::json!({
            "id": id,
            "kind": id,
            "display_name": format!("Connector {}", id),
            "category": category,
            "tags": ["test"],
            "requirements": { "secrets": ["api_key"], "webhooks": [] }
        }))
        .unwrap();

        RegistryRepository::upsert(&self.state.db, &spec).await.unwrap();
        spec
    }
}
