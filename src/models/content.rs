use crate::entities::{event_entity, news_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

impl NewsResponse {
    /// First `max_chars` characters of the body, cut on a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut out: String = self.body.chars().take(max_chars).collect();
        if self.body.chars().count() > max_chars {
            out.push('…');
        }
        out
    }
}

impl From<news_entity::Model> for NewsResponse {
    fn from(m: news_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            body: m.body,
            image_url: m.image_url,
            is_featured: m.is_featured,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewsQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateNewsRequest {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

impl From<event_entity::Model> for EventResponse {
    fn from(m: event_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            date: m.date,
            location: m.location,
            image_url: m.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    #[schema(example = "Kajian Ahad Pagi")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}
