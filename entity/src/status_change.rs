use sea_orm::entity::prelude::*;

/// Append-only log of lifecycle transitions across every HR record type.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "status_change")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub entity_type: String,
    #[sea_orm(indexed)]
    pub entity_id: i32,
    pub from_status: String,
    pub to_status: String,
    pub action: String,
    pub actor: Option<String>,
    pub note: Option<String>,
    pub changed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
