use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A fundraising target. `current_amount` only grows when a donation is confirmed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub target_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub current_amount: Decimal,
    pub end_date: Option<DateTime<Utc>>,
    pub category_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Campaigns are archived implicitly once their end date has passed.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.end_date.is_none_or(|end| end >= now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
