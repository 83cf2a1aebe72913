use crate::entities::{campaign_entity, category_entity};
use crate::utils::money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<category_entity::Model> for CategoryResponse {
    fn from(m: category_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CampaignResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    /// 0..=100, rounded down
    pub progress_percent: u8,
    pub end_date: Option<DateTime<Utc>>,
    pub is_open: bool,
    pub category: Option<CategoryResponse>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignResponse {
    pub fn from_parts(
        m: campaign_entity::Model,
        category: Option<category_entity::Model>,
        now: DateTime<Utc>,
    ) -> Self {
        let is_open = m.is_open_at(now);
        let target_amount = money::to_f64(m.target_amount);
        let current_amount = money::to_f64(m.current_amount);
        Self {
            id: m.id,
            title: m.title,
            slug: m.slug,
            description: m.description,
            image_url: m.image_url,
            target_amount,
            current_amount,
            progress_percent: money::progress_percent(current_amount, target_amount),
            end_date: m.end_date,
            is_open,
            category: category.map(CategoryResponse::from),
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CampaignQuery {
    /// Category slug
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCampaignRequest {
    #[schema(example = "Renovasi Tempat Wudhu")]
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    #[schema(example = 50000000.0)]
    pub target_amount: f64,
    pub end_date: Option<DateTime<Utc>>,
    pub category_id: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub target_amount: Option<f64>,
    pub end_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    #[schema(example = "Pembangunan")]
    pub name: String,
    pub slug: Option<String>,
}
