use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::registry_connector::{self, ActiveModel, Column, Entity as RegistryEntity};
use crate::entity::tenant_connector::{
    ActiveModel as TenantConnectorActiveModel, Column as TenantConnectorColumn,
    Entity as TenantConnectorEntity,
};
use crate::error::{AppError, AppResult};
use crate::models::{RegistryConnector, RegistrySpec};

/// Repository for the shared connector registry and per-tenant enablement rows
pub struct RegistryRepository;

impl RegistryRepository {
    /// Insert or replace a registry spec, keyed by spec id
    pub async fn upsert(db: &DatabaseConnection, spec: &RegistrySpec) -> AppResult<()> {
        let now = time::OffsetDateTime::now_utc();
        let tags = serde_json::Value::from(spec.tags.clone());
        let capabilities = serde_json::to_value(&spec.capabilities)
            .map_err(|e| AppError::Internal(format!("capabilities serialization: {}", e)))?;
        let requirements = serde_json::to_value(&spec.requirements)
            .map_err(|e| AppError::Internal(format!("requirements serialization: {}", e)))?;

        let model = ActiveModel {
            id: Set(spec.id.clone()),
            kind: Set(spec.normalized_kind()),
            display_name: Set(spec.display_name.clone()),
            category: Set(spec.category.clone()),
            tags: Set(tags),
            capabilities: Set(capabilities),
            requirements: Set(requirements),
            audit_mode: Set(spec.audit_mode.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        RegistryEntity::insert(model)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Kind,
                        Column::DisplayName,
                        Column::Category,
                        Column::Tags,
                        Column::Capabilities,
                        Column::Requirements,
                        Column::AuditMode,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(db)
            .await?;

        Ok(())
    }

    /// List registry connectors with the calling tenant's enabled/configured
    /// flags folded in. `q` matches id or display name, `category` is exact.
    pub async fn list(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        q: Option<&str>,
        category: Option<&str>,
    ) -> AppResult<Vec<RegistryConnector>> {
        let mut query = RegistryEntity::find().order_by_asc(Column::Id);

        if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(Column::Id.contains(q))
                    .add(Column::DisplayName.contains(q)),
            );
        }
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            query = query.filter(Column::Category.eq(category));
        }

        let specs = query.all(db).await?;

        let tenant_rows = TenantConnectorEntity::find()
            .filter(TenantConnectorColumn::TenantId.eq(tenant_id))
            .all(db)
            .await?;
        let tenant_state: HashMap<String, (bool, bool)> = tenant_rows
            .into_iter()
            .map(|row| {
                let configured = row.secrets_encrypted.is_some();
                (row.connector_id, (row.enabled, configured))
            })
            .collect();

        Ok(specs
            .into_iter()
            .map(|spec| {
                let (enabled, configured) = tenant_state
                    .get(&spec.id)
                    .copied()
                    .unwrap_or((false, false));
                into_listing(spec, enabled, configured)
            })
            .collect())
    }

    /// Flip a tenant's enablement of a registry connector, creating the row on
    /// first use. Fresh secret ciphertext replaces the stored value; None
    /// keeps whatever is already configured.
    pub async fn set_tenant_state(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        connector_id: &str,
        enabled: bool,
        secrets_encrypted: Option<Vec<u8>>,
    ) -> AppResult<()> {
        // Only known registry ids can be enabled
        RegistryEntity::find_by_id(connector_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Registry connector".to_string()))?;

        let existing = TenantConnectorEntity::find_by_id((tenant_id, connector_id.to_string()))
            .one(db)
            .await?;
        let now = time::OffsetDateTime::now_utc();

        match existing {
            Some(row) => {
                let mut active: TenantConnectorActiveModel = row.into();
                active.enabled = Set(enabled);
                if let Some(ciphertext) = secrets_encrypted {
                    active.secrets_encrypted = Set(Some(ciphertext));
                }
                active.updated_at = Set(now);
                active.update(db).await?;
            }
            None => {
                let active = TenantConnectorActiveModel {
                    tenant_id: Set(tenant_id),
                    connector_id: Set(connector_id.to_string()),
                    enabled: Set(enabled),
                    secrets_encrypted: Set(secrets_encrypted),
                    updated_at: Set(now),
                };
                active.insert(db).await?;
            }
        }

        Ok(())
    }
}

fn into_listing(model: registry_connector::Model, enabled: bool, configured: bool) -> RegistryConnector {
    RegistryConnector {
        id: model.id,
        kind: model.kind,
        display_name: model.display_name,
        category: model.category.unwrap_or_default(),
        tags: serde_json::from_value(model.tags).unwrap_or_default(),
        capabilities: serde_json::from_value(model.capabilities).unwrap_or_default(),
        requirements: serde_json::from_value(model.requirements).unwrap_or_default(),
        audit_mode: model.audit_mode,
        enabled,
        configured,
    }
}
