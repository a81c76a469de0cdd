use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "connector_operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub connector_id: Uuid,
    /// Preserves the insertion order of the operations array
    pub position: i32,
    pub method: String,
    pub path: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub scopes: Json,
    pub params: Json,
    pub request_tmpl: Json,
    pub enabled: bool,
    pub created_at: TimeDateTimeWithTimeZone,
    pub updated_at: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::connector_definition::Entity",
        from = "Column::ConnectorId",
        to = "super::connector_definition::Column::Id"
    )]
    Connector,
}

impl Related<super::connector_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Connector.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
