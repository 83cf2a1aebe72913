use crate::entities::setting_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl From<setting_entity::Model> for SettingResponse {
    fn from(m: setting_entity::Model) -> Self {
        Self {
            key: m.key,
            value: m.value,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpsertSettingRequest {
    #[schema(example = "runningText_isActive")]
    pub key: String,
    #[schema(example = "true")]
    pub value: String,
}
