use crate::entities::{
    campaign_entity as campaigns, category_entity as categories,
    transaction_entity as transactions,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{money, require_text, slugify, validate_slug};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct CampaignService {
    pool: DatabaseConnection,
}

impl CampaignService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    fn open_condition() -> Condition {
        let now = Utc::now();
        Condition::all().add(campaigns::Column::IsActive.eq(true)).add(
            Condition::any()
                .add(campaigns::Column::EndDate.is_null())
                .add(campaigns::Column::EndDate.gte(now)),
        )
    }

    /// Open campaigns, newest first. `category` is a category slug.
    pub async fn list_active(&self, category: Option<&str>) -> AppResult<Vec<CampaignResponse>> {
        let mut query = campaigns::Entity::find()
            .find_also_related(categories::Entity)
            .filter(Self::open_condition());
        if let Some(slug) = category.map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(categories::Column::Slug.eq(slug));
        }
        let rows = query
            .order_by_desc(campaigns::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|(c, cat)| CampaignResponse::from_parts(c, cat, now))
            .collect())
    }

    pub async fn list_all(&self) -> AppResult<Vec<CampaignResponse>> {
        let rows = campaigns::Entity::find()
            .find_also_related(categories::Entity)
            .order_by_desc(campaigns::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|(c, cat)| CampaignResponse::from_parts(c, cat, now))
            .collect())
    }

    /// Any campaign by id, archived ones included.
    pub async fn get(&self, id: i64) -> AppResult<CampaignResponse> {
        let (campaign, category) = campaigns::Entity::find_by_id(id)
            .find_also_related(categories::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?;
        Ok(CampaignResponse::from_parts(campaign, category, Utc::now()))
    }

    /// Open campaigns for the sitemap.
    pub async fn list_for_sitemap(&self) -> AppResult<Vec<campaigns::Model>> {
        Ok(campaigns::Entity::find()
            .filter(Self::open_condition())
            .order_by_asc(campaigns::Column::Id)
            .all(&self.pool)
            .await?)
    }

    async fn ensure_category(&self, category_id: i64) -> AppResult<()> {
        categories::Entity::find_by_id(category_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::ValidationError("Category does not exist".to_string()))?;
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str) -> AppResult<()> {
        let taken = campaigns::Entity::find()
            .filter(campaigns::Column::Slug.eq(slug))
            .count(&self.pool)
            .await?;
        if taken > 0 {
            return Err(AppError::ValidationError(format!(
                "Campaign slug '{slug}' is already used"
            )));
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateCampaignRequest) -> AppResult<CampaignResponse> {
        let title = require_text("title", &request.title, 200)?;
        let slug = match request.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => validate_slug(s)?,
            _ => slugify(&title),
        };
        if slug.is_empty() {
            return Err(AppError::ValidationError("slug is required".to_string()));
        }
        let target_amount = money::parse_positive_amount(request.target_amount)?;
        self.ensure_category(request.category_id).await?;
        self.ensure_slug_free(&slug).await?;

        let now = Utc::now();
        let model = campaigns::ActiveModel {
            title: Set(title),
            slug: Set(slug),
            description: Set(request.description),
            image_url: Set(request.image_url),
            target_amount: Set(target_amount),
            current_amount: Set(rust_decimal::Decimal::ZERO),
            end_date: Set(request.end_date),
            category_id: Set(request.category_id),
            is_active: Set(request.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(&self.pool).await?;
        log::info!("Campaign {} created ({})", created.id, created.slug);

        self.get(created.id).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateCampaignRequest,
    ) -> AppResult<CampaignResponse> {
        let mut model = campaigns::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Campaign not found".to_string()))?
            .into_active_model();

        if let Some(title) = &request.title {
            model.title = Set(require_text("title", title, 200)?);
        }
        if let Some(description) = request.description {
            model.description = Set(description);
        }
        if let Some(image_url) = request.image_url {
            model.image_url = Set(Some(image_url).filter(|u| !u.trim().is_empty()));
        }
        if let Some(target) = request.target_amount {
            model.target_amount = Set(money::parse_positive_amount(target)?);
        }
        if let Some(end_date) = request.end_date {
            model.end_date = Set(Some(end_date));
        }
        if let Some(category_id) = request.category_id {
            self.ensure_category(category_id).await?;
            model.category_id = Set(category_id);
        }
        if let Some(is_active) = request.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now());
        model.update(&self.pool).await?;

        self.get(id).await
    }

    /// Campaigns that already received donations cannot be removed; deactivate them instead.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let donations = transactions::Entity::find()
            .filter(transactions::Column::CampaignId.eq(id))
            .count(&self.pool)
            .await?;
        if donations > 0 {
            return Err(AppError::ValidationError(
                "Campaign has donations; deactivate it instead".to_string(),
            ));
        }
        let res = campaigns::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Campaign not found".to_string()));
        }
        log::info!("Campaign {id} deleted");
        Ok(())
    }

    pub async fn list_categories(&self) -> AppResult<Vec<CategoryResponse>> {
        let rows = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CategoryResponse::from).collect())
    }

    fn category_fields(request: &CreateCategoryRequest) -> AppResult<(String, String)> {
        let name = require_text("name", &request.name, 100)?;
        let slug = match request.slug.as_deref() {
            Some(s) if !s.trim().is_empty() => validate_slug(s)?,
            _ => slugify(&name),
        };
        if slug.is_empty() {
            return Err(AppError::ValidationError("slug is required".to_string()));
        }
        Ok((name, slug))
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        let (name, slug) = Self::category_fields(&request)?;
        let exists = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug.as_str()))
            .count(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::ValidationError(format!(
                "Category slug '{slug}' is already used"
            )));
        }
        let created = categories::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(CategoryResponse::from(created))
    }

    pub async fn update_category(
        &self,
        id: i64,
        request: CreateCategoryRequest,
    ) -> AppResult<CategoryResponse> {
        let (name, slug) = Self::category_fields(&request)?;
        let clash = categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug.as_str()))
            .filter(categories::Column::Id.ne(id))
            .count(&self.pool)
            .await?;
        if clash > 0 {
            return Err(AppError::ValidationError(format!(
                "Category slug '{slug}' is already used"
            )));
        }
        let mut model = categories::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?
            .into_active_model();
        model.name = Set(name);
        model.slug = Set(slug);
        Ok(CategoryResponse::from(model.update(&self.pool).await?))
    }

    pub async fn delete_category(&self, id: i64) -> AppResult<()> {
        let in_use = campaigns::Entity::find()
            .filter(campaigns::Column::CategoryId.eq(id))
            .count(&self.pool)
            .await?;
        if in_use > 0 {
            return Err(AppError::ValidationError(
                "Category still has campaigns".to_string(),
            ));
        }
        let res = categories::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_get_missing_campaign_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<campaigns::Model>::new()])
            .into_connection();
        let service = CampaignService::new(db);
        assert!(matches!(service.get(99).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_create_rejects_non_positive_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = CampaignService::new(db);
        let result = service
            .create(CreateCampaignRequest {
                title: "Renovasi".to_string(),
                slug: None,
                description: String::new(),
                image_url: None,
                target_amount: 0.0,
                end_date: None,
                category_id: 1,
                is_active: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
