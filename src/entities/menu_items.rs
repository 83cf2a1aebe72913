use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum MenuType {
    /// Plain navigation target (`href` points anywhere)
    #[sea_orm(string_value = "link")]
    Link,
    /// Portal-hosted page served at `/p/{slug}` and rendered by `template`
    #[sea_orm(string_value = "page")]
    Page,
}

/// Admin-configurable navigation entry. Drives the home quick-action grid and the sitemap.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub label: String,
    pub icon: String,
    pub color: String,
    #[sea_orm(unique)]
    pub href: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub menu_type: MenuType,
    pub slug: Option<String>,
    pub template: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
