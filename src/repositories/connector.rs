use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::connector_definition::{
    self, ActiveModel, Column, Entity as DefinitionEntity,
};
use crate::entity::connector_operation::{
    self, ActiveModel as OperationActiveModel, Column as OperationColumn,
    Entity as OperationEntity,
};
use crate::error::{AppError, AppResult};
use crate::models::{Connector, CreateConnector, Operation, OperationDraft, UpdateConnector};
use crate::repositories::TenantRepository;

/// Repository for tenant custom connector definitions and their operations
pub struct ConnectorRepository;

#[async_trait]
impl TenantRepository<Connector> for ConnectorRepository {
    async fn find_by_id(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<Connector> {
        Self::find_with_operations(db, tenant_id, id).await
    }

    async fn delete(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<()> {
        let model = Self::find_definition(db, tenant_id, id).await?;

        let txn = db.begin().await?;
        OperationEntity::delete_many()
            .filter(OperationColumn::ConnectorId.eq(id))
            .exec(&txn)
            .await?;
        model.delete(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    async fn list(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<Vec<Connector>> {
        let definitions = DefinitionEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::DisplayName)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let operations = Self::load_operations(db, definition.id).await?;
            out.push(into_connector(definition, operations));
        }
        Ok(out)
    }

    async fn count(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<u64> {
        let count = DefinitionEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        Ok(count)
    }
}

impl ConnectorRepository {
    /// Create a definition together with its operations array, atomically.
    /// Drafts must already be reconciled (path params ensured, template filled).
    pub async fn create(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        input: &CreateConnector,
    ) -> AppResult<Connector> {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            display_name: Set(input.display_name.clone()),
            title: Set(input.title.clone()),
            summary: Set(input.summary.clone()),
            base_url: Set(input.base_url.clone()),
            auth_ref: Set(input.auth_ref),
            enabled: Set(input.enabled.unwrap_or(false)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = db.begin().await?;
        let definition = model.insert(&txn).await?;
        let operations = Self::insert_operations(&txn, definition.id, &input.operations).await?;
        txn.commit().await?;

        Ok(into_connector(definition, operations))
    }

    /// Find a definition with its operations in insertion order
    pub async fn find_with_operations(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        id: Uuid,
    ) -> AppResult<Connector> {
        let definition = Self::find_definition(db, tenant_id, id).await?;
        let operations = Self::load_operations(db, definition.id).await?;
        Ok(into_connector(definition, operations))
    }

    /// Update structural fields and, when a new array is provided, replace the
    /// whole operations set. Operations are never merged row-by-row. The whole
    /// replace runs in one transaction so a failed insert cannot leave the
    /// existing operations half-deleted.
    pub async fn update(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        id: Uuid,
        input: &UpdateConnector,
    ) -> AppResult<Connector> {
        let definition = Self::find_definition(db, tenant_id, id).await?;
        let mut active: ActiveModel = definition.into();

        if let Some(display_name) = &input.display_name {
            active.display_name = Set(display_name.clone());
        }
        if let Some(title) = &input.title {
            active.title = Set(Some(title.clone()));
        }
        if let Some(summary) = &input.summary {
            active.summary = Set(Some(summary.clone()));
        }
        if let Some(base_url) = &input.base_url {
            active.base_url = Set(base_url.clone());
        }
        if let Some(auth_ref) = input.auth_ref {
            active.auth_ref = Set(Some(auth_ref));
        }
        if let Some(enabled) = input.enabled {
            active.enabled = Set(enabled);
        }
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let txn = db.begin().await?;
        let definition = active.update(&txn).await?;

        let operations = match &input.operations {
            Some(drafts) => {
                OperationEntity::delete_many()
                    .filter(OperationColumn::ConnectorId.eq(id))
                    .exec(&txn)
                    .await?;
                Self::insert_operations(&txn, id, drafts).await?
            }
            None => Self::load_operations(&txn, id).await?,
        };
        txn.commit().await?;

        Ok(into_connector(definition, operations))
    }

    /// Partial update of a single operation: the enabled flag only
    pub async fn set_operation_enabled(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        connector_id: Uuid,
        operation_id: Uuid,
        enabled: bool,
    ) -> AppResult<()> {
        // Ensure the operation belongs to the tenant's connector
        Self::find_definition(db, tenant_id, connector_id).await?;

        let operation = OperationEntity::find_by_id(operation_id)
            .filter(OperationColumn::ConnectorId.eq(connector_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Operation".to_string()))?;

        let mut active: OperationActiveModel = operation.into();
        active.enabled = Set(enabled);
        active.updated_at = Set(time::OffsetDateTime::now_utc());
        active.update(db).await?;

        Ok(())
    }

    async fn find_definition(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        id: Uuid,
    ) -> AppResult<connector_definition::Model> {
        DefinitionEntity::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Connector".to_string()))
    }

    async fn load_operations<C: ConnectionTrait>(
        db: &C,
        connector_id: Uuid,
    ) -> AppResult<Vec<Operation>> {
        let models = OperationEntity::find()
            .filter(OperationColumn::ConnectorId.eq(connector_id))
            .order_by_asc(OperationColumn::Position)
            .all(db)
            .await?;

        Ok(models.into_iter().map(Operation::from).collect())
    }

    async fn insert_operations<C: ConnectionTrait>(
        db: &C,
        connector_id: Uuid,
        drafts: &[OperationDraft],
    ) -> AppResult<Vec<Operation>> {
        let now = time::OffsetDateTime::now_utc();
        let mut out = Vec::with_capacity(drafts.len());

        for (position, draft) in drafts.iter().enumerate() {
            let params = serde_json::to_value(&draft.params)
                .map_err(|e| AppError::Internal(format!("params serialization: {}", e)))?;
            let request_tmpl = serde_json::to_value(draft.request_tmpl.clone().unwrap_or_default())
                .map_err(|e| AppError::Internal(format!("template serialization: {}", e)))?;
            let scopes = serde_json::Value::from(draft.scopes.clone());

            let model = OperationActiveModel {
                id: Set(Uuid::new_v4()),
                connector_id: Set(connector_id),
                position: Set(position as i32),
                method: Set(draft.method.clone()),
                path: Set(draft.path.clone()),
                title: Set(draft.title.clone()),
                summary: Set(draft.summary.clone()),
                scopes: Set(scopes),
                params: Set(params),
                request_tmpl: Set(request_tmpl),
                enabled: Set(draft.enabled.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
            };
            out.push(Operation::from(model.insert(db).await?));
        }

        Ok(out)
    }
}

fn into_connector(
    definition: connector_definition::Model,
    operations: Vec<Operation>,
) -> Connector {
    Connector {
        id: definition.id,
        tenant_id: definition.tenant_id,
        display_name: definition.display_name,
        title: definition.title,
        summary: definition.summary,
        base_url: definition.base_url,
        auth_ref: definition.auth_ref,
        enabled: definition.enabled,
        operations,
        created_at: definition.created_at,
        updated_at: definition.updated_at,
    }
}

// Conversion from SeaORM model to our domain model.
// JSON columns written by older consoles may carry unknown fields; tolerant
// decoding mirrors how the previous service read these columns.
impl From<connector_operation::Model> for Operation {
    fn from(m: connector_operation::Model) -> Self {
        Self {
            id: m.id,
            method: m.method,
            path: m.path,
            title: m.title,
            summary: m.summary,
            scopes: serde_json::from_value(m.scopes).unwrap_or_default(),
            params: serde_json::from_value(m.params).unwrap_or_default(),
            request_tmpl: serde_json::from_value(m.request_tmpl).unwrap_or_default(),
            enabled: m.enabled,
        }
    }
}
