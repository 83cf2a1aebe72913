use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{normalize_email, require_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        let email = normalize_email(email)?;
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    pub async fn admin_list(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let paginator = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .paginate(&self.pool, params.get_per_page());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.get_page() - 1).await?;
        Ok(PaginatedResponse::new(
            rows.into_iter().map(UserResponse::from).collect(),
            params,
            total,
        ))
    }

    pub async fn admin_update(
        &self,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        if request.role.is_none() && request.is_contributor.is_none() && request.name.is_none() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
            .into_active_model();
        if let Some(name) = &request.name {
            model.name = Set(require_text("name", name, 100)?);
        }
        if let Some(role) = request.role {
            model.role = Set(role);
        }
        if let Some(flag) = request.is_contributor {
            model.is_contributor = Set(flag);
        }
        model.updated_at = Set(Utc::now());
        let updated = model.update(&self.pool).await?;
        log::info!("User {} updated by admin (role={})", updated.id, updated.role);
        Ok(UserResponse::from(updated))
    }

    pub async fn promote_admin(&self, email: &str) -> AppResult<UserResponse> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user with email {email}")))?;
        self.admin_update(
            user.id,
            UpdateUserRequest {
                role: Some(UserRole::Admin),
                is_contributor: None,
                name: None,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_admin_update_requires_a_field() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = UserService::new(db);
        let result = service
            .admin_update(
                1,
                UpdateUserRequest {
                    role: None,
                    is_contributor: None,
                    name: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_profile_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = UserService::new(db);
        assert!(matches!(
            service.get_profile(42).await,
            Err(AppError::NotFound(_))
        ));
    }
}
