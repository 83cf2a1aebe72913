//! `/api/admin` endpoints. The session middleware has already checked the
//! caller is an admin by the time any of these run.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middlewares::RequireAdmin;
use crate::models::*;
use crate::services::{
    CampaignService, ContentService, DonationService, MenuService, SettingsService, UserService,
};
use crate::utils::uploads::sanitize_file_name;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn respond<T: Serialize>(result: AppResult<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": data
        })),
        Err(e) => e.error_response(),
    }
}

fn respond_deleted(result: AppResult<()>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Deleted"
        })),
        Err(e) => e.error_response(),
    }
}

// Campaigns

#[utoipa::path(get, path = "/api/admin/campaigns", tag = "admin",
    responses((status = 200, description = "All campaigns, including archived", body = Vec<CampaignResponse>)))]
pub async fn list_campaigns(service: web::Data<CampaignService>) -> Result<HttpResponse> {
    Ok(respond(service.list_all().await))
}

#[utoipa::path(post, path = "/api/admin/campaigns", tag = "admin", request_body = CreateCampaignRequest,
    responses((status = 200, description = "Created", body = CampaignResponse), (status = 400, description = "Invalid input")))]
pub async fn create_campaign(
    service: web::Data<CampaignService>,
    request: web::Json<CreateCampaignRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.create(request.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/campaigns/{id}", tag = "admin", request_body = UpdateCampaignRequest,
    params(("id" = i64, Path, description = "Campaign id")),
    responses((status = 200, description = "Updated", body = CampaignResponse), (status = 404, description = "Not found")))]
pub async fn update_campaign(
    service: web::Data<CampaignService>,
    path: web::Path<i64>,
    request: web::Json<UpdateCampaignRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service.update(path.into_inner(), request.into_inner()).await,
    ))
}

#[utoipa::path(delete, path = "/api/admin/campaigns/{id}", tag = "admin",
    params(("id" = i64, Path, description = "Campaign id")),
    responses((status = 200, description = "Deleted"), (status = 400, description = "Campaign has donations")))]
pub async fn delete_campaign(
    service: web::Data<CampaignService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete(path.into_inner()).await))
}

// Categories

#[utoipa::path(get, path = "/api/admin/categories", tag = "admin",
    responses((status = 200, description = "Categories", body = Vec<CategoryResponse>)))]
pub async fn list_categories(service: web::Data<CampaignService>) -> Result<HttpResponse> {
    Ok(respond(service.list_categories().await))
}

#[utoipa::path(post, path = "/api/admin/categories", tag = "admin", request_body = CreateCategoryRequest,
    responses((status = 200, description = "Created", body = CategoryResponse)))]
pub async fn create_category(
    service: web::Data<CampaignService>,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.create_category(request.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/categories/{id}", tag = "admin", request_body = CreateCategoryRequest,
    params(("id" = i64, Path, description = "Category id")),
    responses((status = 200, description = "Updated", body = CategoryResponse)))]
pub async fn update_category(
    service: web::Data<CampaignService>,
    path: web::Path<i64>,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service
            .update_category(path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(delete, path = "/api/admin/categories/{id}", tag = "admin",
    params(("id" = i64, Path, description = "Category id")),
    responses((status = 200, description = "Deleted")))]
pub async fn delete_category(
    service: web::Data<CampaignService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete_category(path.into_inner()).await))
}

// News and events

#[utoipa::path(get, path = "/api/admin/news", tag = "admin",
    responses((status = 200, description = "News page")))]
pub async fn list_news(
    service: web::Data<ContentService>,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse> {
    Ok(respond(service.list_news(&query).await))
}

#[utoipa::path(post, path = "/api/admin/news", tag = "admin", request_body = CreateNewsRequest,
    responses((status = 200, description = "Created", body = NewsResponse)))]
pub async fn create_news(
    service: web::Data<ContentService>,
    request: web::Json<CreateNewsRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.create_news(request.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/news/{id}", tag = "admin", request_body = UpdateNewsRequest,
    params(("id" = i64, Path, description = "News id")),
    responses((status = 200, description = "Updated", body = NewsResponse)))]
pub async fn update_news(
    service: web::Data<ContentService>,
    path: web::Path<i64>,
    request: web::Json<UpdateNewsRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service
            .update_news(path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(delete, path = "/api/admin/news/{id}", tag = "admin",
    params(("id" = i64, Path, description = "News id")),
    responses((status = 200, description = "Deleted")))]
pub async fn delete_news(
    service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete_news(path.into_inner()).await))
}

#[utoipa::path(get, path = "/api/admin/events", tag = "admin",
    responses((status = 200, description = "All events, past ones included", body = Vec<EventResponse>)))]
pub async fn list_events(service: web::Data<ContentService>) -> Result<HttpResponse> {
    Ok(respond(service.list_all_events().await))
}

#[utoipa::path(post, path = "/api/admin/events", tag = "admin", request_body = CreateEventRequest,
    responses((status = 200, description = "Created", body = EventResponse)))]
pub async fn create_event(
    service: web::Data<ContentService>,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.create_event(request.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/events/{id}", tag = "admin", request_body = UpdateEventRequest,
    params(("id" = i64, Path, description = "Event id")),
    responses((status = 200, description = "Updated", body = EventResponse)))]
pub async fn update_event(
    service: web::Data<ContentService>,
    path: web::Path<i64>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service
            .update_event(path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(delete, path = "/api/admin/events/{id}", tag = "admin",
    params(("id" = i64, Path, description = "Event id")),
    responses((status = 200, description = "Deleted")))]
pub async fn delete_event(
    service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete_event(path.into_inner()).await))
}

// Menu items

#[utoipa::path(get, path = "/api/admin/menu-items", tag = "admin",
    responses((status = 200, description = "All menu items", body = Vec<MenuItemResponse>)))]
pub async fn list_menu_items(service: web::Data<MenuService>) -> Result<HttpResponse> {
    Ok(respond(service.list_all().await))
}

#[utoipa::path(post, path = "/api/admin/menu-items", tag = "admin", request_body = CreateMenuItemRequest,
    responses((status = 200, description = "Created", body = MenuItemResponse), (status = 400, description = "Duplicate href")))]
pub async fn create_menu_item(
    service: web::Data<MenuService>,
    request: web::Json<CreateMenuItemRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.create(request.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/menu-items/{id}", tag = "admin", request_body = UpdateMenuItemRequest,
    params(("id" = i64, Path, description = "Menu item id")),
    responses((status = 200, description = "Updated", body = MenuItemResponse)))]
pub async fn update_menu_item(
    service: web::Data<MenuService>,
    path: web::Path<i64>,
    request: web::Json<UpdateMenuItemRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service.update(path.into_inner(), request.into_inner()).await,
    ))
}

#[utoipa::path(delete, path = "/api/admin/menu-items/{id}", tag = "admin",
    params(("id" = i64, Path, description = "Menu item id")),
    responses((status = 200, description = "Deleted")))]
pub async fn delete_menu_item(
    service: web::Data<MenuService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete(path.into_inner()).await))
}

#[utoipa::path(put, path = "/api/admin/menu-items/reorder", tag = "admin", request_body = ReorderMenuItemsRequest,
    responses((status = 200, description = "Items in their new order", body = Vec<MenuItemResponse>)))]
pub async fn reorder_menu_items(
    service: web::Data<MenuService>,
    request: web::Json<ReorderMenuItemsRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.reorder(request.into_inner()).await))
}

// Settings

#[utoipa::path(get, path = "/api/admin/settings", tag = "admin",
    responses((status = 200, description = "Every stored setting", body = Vec<SettingResponse>)))]
pub async fn list_settings(service: web::Data<SettingsService>) -> Result<HttpResponse> {
    Ok(respond(service.list_all().await))
}

#[utoipa::path(put, path = "/api/admin/settings", tag = "admin", request_body = UpsertSettingRequest,
    responses((status = 200, description = "Stored", body = SettingResponse)))]
pub async fn upsert_setting(
    service: web::Data<SettingsService>,
    request: web::Json<UpsertSettingRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.upsert(request.into_inner()).await))
}

#[utoipa::path(delete, path = "/api/admin/settings/{key}", tag = "admin",
    params(("key" = String, Path, description = "Setting key")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "No such key")))]
pub async fn delete_setting(
    service: web::Data<SettingsService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(respond_deleted(service.delete(&path).await))
}

// Transactions

#[utoipa::path(get, path = "/api/admin/transactions", tag = "admin",
    params(
        ("status" = Option<String>, Query, description = "pending, confirmed or rejected"),
        ("page" = Option<u64>, Query, description = "1-based page"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Transactions page")))]
pub async fn list_transactions(
    service: web::Data<DonationService>,
    query: web::Query<TransactionQuery>,
) -> Result<HttpResponse> {
    Ok(respond(service.admin_list(&query).await))
}

#[utoipa::path(post, path = "/api/admin/transactions/{id}/confirm", tag = "admin",
    params(("id" = i64, Path, description = "Transaction id")),
    responses((status = 200, description = "Confirmed", body = TransactionResponse), (status = 400, description = "Not pending")))]
pub async fn confirm_transaction(
    service: web::Data<DonationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond(service.confirm(path.into_inner()).await))
}

#[utoipa::path(post, path = "/api/admin/transactions/{id}/reject", tag = "admin",
    params(("id" = i64, Path, description = "Transaction id")),
    responses((status = 200, description = "Rejected", body = TransactionResponse), (status = 400, description = "Not pending")))]
pub async fn reject_transaction(
    service: web::Data<DonationService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond(service.reject(path.into_inner()).await))
}

// Users

#[utoipa::path(get, path = "/api/admin/users", tag = "admin",
    params(
        ("page" = Option<u64>, Query, description = "1-based page"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Users page")))]
pub async fn list_users(
    service: web::Data<UserService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    Ok(respond(service.admin_list(&query).await))
}

#[utoipa::path(put, path = "/api/admin/users/{id}", tag = "admin", request_body = UpdateUserRequest,
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Updated", body = UserResponse)))]
pub async fn update_user(
    service: web::Data<UserService>,
    path: web::Path<i64>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    Ok(respond(
        service
            .admin_update(path.into_inner(), request.into_inner())
            .await,
    ))
}

// Uploads

/// Stores `body` as `{dir}/{uuid}-{name}` and returns the stored file name.
pub async fn store_upload(dir: &Path, original_name: &str, body: &[u8]) -> AppResult<String> {
    if body.is_empty() {
        return Err(AppError::ValidationError("Upload body is empty".to_string()));
    }
    let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&file_name), body).await?;
    log::info!("Stored upload {file_name} ({} bytes)", body.len());
    Ok(file_name)
}

#[utoipa::path(post, path = "/api/admin/uploads/{filename}", tag = "admin",
    params(("filename" = String, Path, description = "Original file name")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses((status = 200, description = "Stored; data.url is the public path"), (status = 400, description = "Empty body")))]
pub async fn upload_file(
    config: web::Data<Config>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    match store_upload(Path::new(&config.app.upload_dir), &path, &body).await {
        Ok(file_name) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "url": format!("/uploads/{file_name}") }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(RequireAdmin)
            .route("/campaigns", web::get().to(list_campaigns))
            .route("/campaigns", web::post().to(create_campaign))
            .route("/campaigns/{id}", web::put().to(update_campaign))
            .route("/campaigns/{id}", web::delete().to(delete_campaign))
            .route("/categories", web::get().to(list_categories))
            .route("/categories", web::post().to(create_category))
            .route("/categories/{id}", web::put().to(update_category))
            .route("/categories/{id}", web::delete().to(delete_category))
            .route("/news", web::get().to(list_news))
            .route("/news", web::post().to(create_news))
            .route("/news/{id}", web::put().to(update_news))
            .route("/news/{id}", web::delete().to(delete_news))
            .route("/events", web::get().to(list_events))
            .route("/events", web::post().to(create_event))
            .route("/events/{id}", web::put().to(update_event))
            .route("/events/{id}", web::delete().to(delete_event))
            .route("/menu-items", web::get().to(list_menu_items))
            .route("/menu-items", web::post().to(create_menu_item))
            // before {id} so "reorder" is not parsed as an id
            .route("/menu-items/reorder", web::put().to(reorder_menu_items))
            .route("/menu-items/{id}", web::put().to(update_menu_item))
            .route("/menu-items/{id}", web::delete().to(delete_menu_item))
            .route("/settings", web::get().to(list_settings))
            .route("/settings", web::put().to(upsert_setting))
            .route("/settings/{key}", web::delete().to(delete_setting))
            .route("/transactions", web::get().to(list_transactions))
            .route("/transactions/{id}/confirm", web::post().to(confirm_transaction))
            .route("/transactions/{id}/reject", web::post().to(reject_transaction))
            .route("/users", web::get().to(list_users))
            .route("/users/{id}", web::put().to(update_user))
            .service(
                web::resource("/uploads/{filename}")
                    .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
                    .route(web::post().to(upload_file)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_store_upload_prefixes_uuid_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        let name = store_upload(dir.path(), "QRIS masjid (1).png", b"png-bytes")
            .await
            .unwrap();
        assert!(name.ends_with("-QRIS-masjid--1-.png"));
        assert_eq!(name.len(), 36 + 1 + "QRIS-masjid--1-.png".len());
        let stored = std::fs::read(dir.path().join(&name)).unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[actix_web::test]
    async fn test_store_upload_rejects_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store_upload(dir.path(), "a.png", b"").await,
            Err(AppError::ValidationError(_))
        ));
    }
}
