use crate::entities::{event_entity as events, news_entity as news};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::require_text;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// News articles and mosque events.
#[derive(Clone)]
pub struct ContentService {
    pool: DatabaseConnection,
}

impl ContentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_news(&self, query: &NewsQuery) -> AppResult<PaginatedResponse<NewsResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = news::Entity::find();
        if let Some(featured) = query.featured {
            select = select.filter(news::Column::IsFeatured.eq(featured));
        }
        let paginator = select
            .order_by_desc(news::Column::CreatedAt)
            .order_by_desc(news::Column::Id)
            .paginate(&self.pool, params.get_per_page());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.get_page() - 1).await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(NewsResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn get_news(&self, id: i64) -> AppResult<NewsResponse> {
        news::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .map(NewsResponse::from)
            .ok_or_else(|| AppError::NotFound("News not found".to_string()))
    }

    /// Featured articles first, then the most recent ones, for the home page.
    pub async fn latest_news(&self, limit: u64) -> AppResult<Vec<NewsResponse>> {
        let rows = news::Entity::find()
            .order_by_desc(news::Column::IsFeatured)
            .order_by_desc(news::Column::CreatedAt)
            .limit(limit)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(NewsResponse::from).collect())
    }

    pub async fn list_news_for_sitemap(&self) -> AppResult<Vec<news::Model>> {
        Ok(news::Entity::find()
            .order_by_asc(news::Column::Id)
            .all(&self.pool)
            .await?)
    }

    pub async fn create_news(&self, request: CreateNewsRequest) -> AppResult<NewsResponse> {
        let created = news::ActiveModel {
            title: Set(require_text("title", &request.title, 200)?),
            body: Set(require_text("body", &request.body, 50_000)?),
            image_url: Set(request.image_url.filter(|u| !u.trim().is_empty())),
            is_featured: Set(request.is_featured),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("News {} published", created.id);
        Ok(NewsResponse::from(created))
    }

    pub async fn update_news(&self, id: i64, request: UpdateNewsRequest) -> AppResult<NewsResponse> {
        let mut model = news::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("News not found".to_string()))?
            .into_active_model();
        if let Some(title) = &request.title {
            model.title = Set(require_text("title", title, 200)?);
        }
        if let Some(body) = &request.body {
            model.body = Set(require_text("body", body, 50_000)?);
        }
        if let Some(image_url) = request.image_url {
            model.image_url = Set(Some(image_url).filter(|u| !u.trim().is_empty()));
        }
        if let Some(featured) = request.is_featured {
            model.is_featured = Set(featured);
        }
        Ok(NewsResponse::from(model.update(&self.pool).await?))
    }

    pub async fn delete_news(&self, id: i64) -> AppResult<()> {
        let res = news::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("News not found".to_string()));
        }
        Ok(())
    }

    /// Events from now on, soonest first.
    pub async fn upcoming_events(&self, limit: Option<u64>) -> AppResult<Vec<EventResponse>> {
        let mut select = events::Entity::find()
            .filter(events::Column::Date.gte(Utc::now()))
            .order_by_asc(events::Column::Date);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        let rows = select.all(&self.pool).await?;
        Ok(rows.into_iter().map(EventResponse::from).collect())
    }

    pub async fn list_all_events(&self) -> AppResult<Vec<EventResponse>> {
        let rows = events::Entity::find()
            .order_by_desc(events::Column::Date)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(EventResponse::from).collect())
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> AppResult<EventResponse> {
        let created = events::ActiveModel {
            title: Set(require_text("title", &request.title, 200)?),
            description: Set(request.description),
            date: Set(request.date),
            location: Set(request.location.filter(|l| !l.trim().is_empty())),
            image_url: Set(request.image_url.filter(|u| !u.trim().is_empty())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(EventResponse::from(created))
    }

    pub async fn update_event(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let mut model = events::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?
            .into_active_model();
        if let Some(title) = &request.title {
            model.title = Set(require_text("title", title, 200)?);
        }
        if let Some(description) = request.description {
            model.description = Set(description);
        }
        if let Some(date) = request.date {
            model.date = Set(date);
        }
        if let Some(location) = request.location {
            model.location = Set(Some(location).filter(|l| !l.trim().is_empty()));
        }
        if let Some(image_url) = request.image_url {
            model.image_url = Set(Some(image_url).filter(|u| !u.trim().is_empty()));
        }
        Ok(EventResponse::from(model.update(&self.pool).await?))
    }

    pub async fn delete_event(&self, id: i64) -> AppResult<()> {
        let res = events::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[actix_web::test]
    async fn test_get_news_returns_row() {
        let now = Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![news::Model {
                id: 7,
                title: "Jadwal Tarawih".to_string(),
                body: "Tarawih dimulai pukul 19.30".to_string(),
                image_url: None,
                is_featured: true,
                created_at: now,
            }]])
            .into_connection();
        let service = ContentService::new(db);
        let item = service.get_news(7).await.unwrap();
        assert_eq!(item.title, "Jadwal Tarawih");
        assert!(item.is_featured);
    }

    #[actix_web::test]
    async fn test_delete_missing_event_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let service = ContentService::new(db);
        assert!(matches!(
            service.delete_event(3).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_create_news_requires_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ContentService::new(db);
        let result = service
            .create_news(CreateNewsRequest {
                title: "   ".to_string(),
                body: "isi".to_string(),
                image_url: None,
                is_featured: false,
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
