use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::auth_config::{self, ActiveModel, Column, Entity as AuthConfigEntity};
use crate::error::{AppError, AppResult};
use crate::models::{AuthConfig, CreateAuthConfig, UpdateAuthConfig};
use crate::repositories::TenantRepository;

/// Repository for tenant credential bindings.
/// Secret ciphertext is written here but never read back into API responses.
pub struct AuthConfigRepository;

#[async_trait]
impl TenantRepository<AuthConfig> for AuthConfigRepository {
    async fn find_by_id(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<AuthConfig> {
        let model = Self::find_model(db, tenant_id, id).await?;
        Ok(AuthConfig::from(model))
    }

    async fn delete(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<()> {
        let model = Self::find_model(db, tenant_id, id).await?;
        model.delete(db).await?;
        Ok(())
    }

    async fn list(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<Vec<AuthConfig>> {
        let models = AuthConfigEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .order_by_asc(Column::Name)
            .all(db)
            .await?;
        Ok(models.into_iter().map(AuthConfig::from).collect())
    }

    async fn count(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<u64> {
        let count = AuthConfigEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(db)
            .await?;
        Ok(count)
    }
}

impl AuthConfigRepository {
    pub async fn create(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        input: &CreateAuthConfig,
        secrets_encrypted: Option<Vec<u8>>,
    ) -> AppResult<AuthConfig> {
        let now = time::OffsetDateTime::now_utc();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            name: Set(input.name.clone()),
            auth_type: Set(input.auth_type.clone()),
            config: Set(input.config.clone()),
            secrets_encrypted: Set(secrets_encrypted),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model.insert(db).await?;
        Ok(AuthConfig::from(model))
    }

    /// Partial update. Secret ciphertext is only rewritten when the caller
    /// supplied fresh secrets; None leaves the stored material untouched.
    pub async fn update(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        id: Uuid,
        input: &UpdateAuthConfig,
        secrets_encrypted: Option<Vec<u8>>,
    ) -> AppResult<AuthConfig> {
        let model = Self::find_model(db, tenant_id, id).await?;
        let mut active: ActiveModel = model.into();

        if let Some(name) = &input.name {
            active.name = Set(name.clone());
        }
        if let Some(auth_type) = &input.auth_type {
            active.auth_type = Set(auth_type.clone());
        }
        if let Some(config) = &input.config {
            active.config = Set(config.clone());
        }
        if let Some(ciphertext) = secrets_encrypted {
            active.secrets_encrypted = Set(Some(ciphertext));
        }
        active.updated_at = Set(time::OffsetDateTime::now_utc());

        let model = active.update(db).await?;
        Ok(AuthConfig::from(model))
    }

    async fn find_model(
        db: &DatabaseConnection,
        tenant_id: Uuid,
        id: Uuid,
    ) -> AppResult<auth_config::Model> {
        AuthConfigEntity::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Auth config".to_string()))
    }
}

impl From<auth_config::Model> for AuthConfig {
    fn from(m: auth_config::Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            name: m.name,
            auth_type: m.auth_type,
            config: m.config,
            updated_at: m.updated_at,
        }
    }
}
