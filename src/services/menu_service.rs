use crate::entities::{MenuType, menu_item_entity as menu_items, transaction_entity as transactions};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{require_text, validate_color, validate_slug};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

pub const DEFAULT_MENU_ICON: &str = "circle";
pub const DEFAULT_MENU_COLOR: &str = "#0f766e";

/// Templates a page-type menu item may be rendered with.
pub const PAGE_TEMPLATES: &[&str] = &["donation", "article", "contact"];

#[derive(Clone)]
pub struct MenuService {
    pool: DatabaseConnection,
}

impl MenuService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Active items in display order.
    pub async fn list_active(&self) -> AppResult<Vec<menu_items::Model>> {
        Ok(menu_items::Entity::find()
            .filter(menu_items::Column::IsActive.eq(true))
            .order_by_asc(menu_items::Column::SortOrder)
            .order_by_asc(menu_items::Column::Id)
            .all(&self.pool)
            .await?)
    }

    pub async fn list_all(&self) -> AppResult<Vec<MenuItemResponse>> {
        let rows = menu_items::Entity::find()
            .order_by_asc(menu_items::Column::SortOrder)
            .order_by_asc(menu_items::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MenuItemResponse::from).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<menu_items::Model> {
        menu_items::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))
    }

    /// Active page-type item served at `/p/{slug}`.
    pub async fn get_page(&self, slug: &str) -> AppResult<menu_items::Model> {
        menu_items::Entity::find()
            .filter(menu_items::Column::Slug.eq(slug))
            .filter(menu_items::Column::MenuType.eq(MenuType::Page))
            .filter(menu_items::Column::IsActive.eq(true))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Page not found".to_string()))
    }

    async fn ensure_href_free(&self, href: &str, except: Option<i64>) -> AppResult<()> {
        let mut query = menu_items::Entity::find().filter(menu_items::Column::Href.eq(href));
        if let Some(id) = except {
            query = query.filter(menu_items::Column::Id.ne(id));
        }
        if query.count(&self.pool).await? > 0 {
            return Err(AppError::ValidationError(format!(
                "A menu item already links to {href}"
            )));
        }
        Ok(())
    }

    async fn next_sort_order(&self) -> AppResult<i32> {
        let max: Option<Option<i32>> = menu_items::Entity::find()
            .select_only()
            .column_as(menu_items::Column::SortOrder.max(), "max_order")
            .into_tuple()
            .one(&self.pool)
            .await?;
        Ok(max.flatten().map(|m| m + 1).unwrap_or(0))
    }

    pub async fn create(&self, request: CreateMenuItemRequest) -> AppResult<MenuItemResponse> {
        let label = require_text("label", &request.label, 100)?;
        let icon = request
            .icon
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_MENU_ICON)
            .to_string();
        let color = match request.color.as_deref() {
            Some(c) if !c.trim().is_empty() => validate_color(c)?,
            _ => DEFAULT_MENU_COLOR.to_string(),
        };
        let menu_type = request.menu_type.unwrap_or(MenuType::Link);

        let (href, slug, template) = match menu_type {
            MenuType::Link => {
                let href = require_text("href", request.href.as_deref().unwrap_or(""), 500)?;
                (href, None, None)
            }
            MenuType::Page => {
                let slug = validate_slug(request.slug.as_deref().unwrap_or(""))?;
                let template = validate_template(request.template.as_deref())?;
                (format!("/p/{slug}"), Some(slug), Some(template))
            }
        };
        self.ensure_href_free(&href, None).await?;

        let sort_order = match request.order {
            Some(o) => o,
            None => self.next_sort_order().await?,
        };

        let now = Utc::now();
        let created = menu_items::ActiveModel {
            label: Set(label),
            icon: Set(icon),
            color: Set(color),
            href: Set(href),
            sort_order: Set(sort_order),
            is_active: Set(request.is_active.unwrap_or(true)),
            menu_type: Set(menu_type),
            slug: Set(slug),
            template: Set(template),
            content: Set(request.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Menu item {} created -> {}", created.id, created.href);
        Ok(MenuItemResponse::from(created))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateMenuItemRequest,
    ) -> AppResult<MenuItemResponse> {
        let current = self.get(id).await?;
        let is_page = current.menu_type == MenuType::Page;
        let mut model = current.into_active_model();

        if let Some(label) = &request.label {
            model.label = Set(require_text("label", label, 100)?);
        }
        if let Some(icon) = &request.icon {
            let icon = icon.trim();
            model.icon = Set(if icon.is_empty() {
                DEFAULT_MENU_ICON.to_string()
            } else {
                icon.to_string()
            });
        }
        if let Some(color) = &request.color {
            model.color = Set(validate_color(color)?);
        }
        if let Some(href) = &request.href {
            if is_page {
                return Err(AppError::ValidationError(
                    "Page links are derived from their slug".to_string(),
                ));
            }
            let href = require_text("href", href, 500)?;
            self.ensure_href_free(&href, Some(id)).await?;
            model.href = Set(href);
        }
        if let Some(order) = request.order {
            model.sort_order = Set(order);
        }
        if let Some(active) = request.is_active {
            model.is_active = Set(active);
        }
        if request.template.is_some() {
            if !is_page {
                return Err(AppError::ValidationError(
                    "Only page items have a template".to_string(),
                ));
            }
            model.template = Set(Some(validate_template(request.template.as_deref())?));
        }
        if let Some(content) = request.content {
            model.content = Set(Some(content));
        }
        model.updated_at = Set(Utc::now());
        Ok(MenuItemResponse::from(model.update(&self.pool).await?))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let donations = transactions::Entity::find()
            .filter(transactions::Column::MenuItemId.eq(id))
            .count(&self.pool)
            .await?;
        if donations > 0 {
            return Err(AppError::ValidationError(
                "Menu item has donations; deactivate it instead".to_string(),
            ));
        }
        let res = menu_items::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Menu item not found".to_string()));
        }
        Ok(())
    }

    /// Sort order becomes each id's position in `ids`. All or nothing.
    pub async fn reorder(&self, request: ReorderMenuItemsRequest) -> AppResult<Vec<MenuItemResponse>> {
        if request.ids.is_empty() {
            return Err(AppError::ValidationError("ids must not be empty".to_string()));
        }
        let txn = self.pool.begin().await?;
        let now = Utc::now();
        for (position, id) in request.ids.iter().enumerate() {
            let res = menu_items::Entity::update_many()
                .col_expr(menu_items::Column::SortOrder, Expr::value(position as i32))
                .col_expr(menu_items::Column::UpdatedAt, Expr::value(now))
                .filter(menu_items::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
            if res.rows_affected == 0 {
                txn.rollback().await?;
                return Err(AppError::NotFound(format!("Menu item {id} not found")));
            }
        }
        txn.commit().await?;
        self.list_all().await
    }
}

fn validate_template(template: Option<&str>) -> AppResult<String> {
    let template = template.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("article");
    if PAGE_TEMPLATES.contains(&template) {
        Ok(template.to_string())
    } else {
        Err(AppError::ValidationError(format!(
            "Unknown page template: {template}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_validate_template() {
        assert_eq!(validate_template(None).unwrap(), "article");
        assert_eq!(validate_template(Some("donation")).unwrap(), "donation");
        assert!(validate_template(Some("landing")).is_err());
    }

    #[actix_web::test]
    async fn test_list_active_keeps_query_order() {
        let now = Utc::now();
        let item = |id: i64, order: i32| menu_items::Model {
            id,
            label: format!("Item {id}"),
            icon: "mosque".to_string(),
            color: DEFAULT_MENU_COLOR.to_string(),
            href: format!("/item-{id}"),
            sort_order: order,
            is_active: true,
            menu_type: MenuType::Link,
            slug: None,
            template: None,
            content: None,
            created_at: now,
            updated_at: now,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![item(3, 0), item(1, 1), item(2, 2)]])
            .into_connection();
        let service = MenuService::new(db);
        let ids: Vec<i64> = service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[actix_web::test]
    async fn test_create_link_requires_href() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = MenuService::new(db);
        let result = service
            .create(CreateMenuItemRequest {
                label: "Infaq".to_string(),
                icon: None,
                color: None,
                href: None,
                order: None,
                is_active: None,
                menu_type: None,
                slug: None,
                template: None,
                content: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
