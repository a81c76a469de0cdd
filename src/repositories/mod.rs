pub mod auth_config;
pub mod connector;
pub mod registry;

pub use auth_config::AuthConfigRepository;
pub use connector::ConnectorRepository;
pub use registry::RegistryRepository;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Base repository trait for tenant-scoped CRUD operations.
/// Every lookup carries the tenant id; a row belonging to another tenant is
/// indistinguishable from a missing row.
#[async_trait]
pub trait TenantRepository<T>
where
    T: Send + Sync,
{
    /// Find entity by ID within a tenant
    async fn find_by_id(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<T>;

    /// Delete entity by ID within a tenant
    async fn delete(db: &DatabaseConnection, tenant_id: Uuid, id: Uuid) -> AppResult<()>;

    /// List all entities of a tenant
    async fn list(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<Vec<T>>;

    /// Count a tenant's entities
    async fn count(db: &DatabaseConnection, tenant_id: Uuid) -> AppResult<u64>;
}
