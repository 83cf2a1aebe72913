use crate::entities::{MenuType, menu_item_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i64,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub href: String,
    pub order: i32,
    pub is_active: bool,
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub slug: Option<String>,
    pub template: Option<String>,
}

impl From<menu_item_entity::Model> for MenuItemResponse {
    fn from(m: menu_item_entity::Model) -> Self {
        Self {
            id: m.id,
            label: m.label,
            icon: m.icon,
            color: m.color,
            href: m.href,
            order: m.sort_order,
            is_active: m.is_active,
            menu_type: m.menu_type,
            slug: m.slug,
            template: m.template,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    #[schema(example = "Infaq Jumat")]
    pub label: String,
    #[schema(example = "hand-coins")]
    pub icon: Option<String>,
    #[schema(example = "#0f766e")]
    pub color: Option<String>,
    /// Required for links; derived from `slug` for pages
    pub href: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(rename = "type")]
    pub menu_type: Option<MenuType>,
    pub slug: Option<String>,
    pub template: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub href: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
    pub template: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderMenuItemsRequest {
    /// Menu item ids in their new display order
    pub ids: Vec<i64>,
}
