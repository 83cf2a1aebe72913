//! Read-only JSON endpoints behind the public pages

use crate::models::*;
use crate::services::{
    CampaignService, ContentService, MenuService, PaymentSettings, RunningTextSettings,
    SettingsService,
};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "public",
    params(("category" = Option<String>, Query, description = "Category slug")),
    responses((status = 200, description = "Open campaigns", body = Vec<CampaignResponse>))
)]
pub async fn list_campaigns(
    campaign_service: web::Data<CampaignService>,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse> {
    match campaign_service.list_active(query.category.as_deref()).await {
        Ok(campaigns) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaigns
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "public",
    params(("id" = i64, Path, description = "Campaign id")),
    responses(
        (status = 200, description = "Campaign", body = CampaignResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_campaign(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match campaign_service.get(path.into_inner()).await {
        Ok(campaign) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": campaign
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "public",
    responses((status = 200, description = "Campaign categories", body = Vec<CategoryResponse>))
)]
pub async fn list_categories(campaign_service: web::Data<CampaignService>) -> Result<HttpResponse> {
    match campaign_service.list_categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": categories
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "public",
    params(
        ("page" = Option<u64>, Query, description = "1-based page"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
        ("featured" = Option<bool>, Query, description = "Only featured items")
    ),
    responses((status = 200, description = "News page"))
)]
pub async fn list_news(
    content_service: web::Data<ContentService>,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse> {
    match content_service.list_news(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/news/{id}",
    tag = "public",
    params(("id" = i64, Path, description = "News id")),
    responses(
        (status = 200, description = "News item", body = NewsResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_news(
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match content_service.get_news(path.into_inner()).await {
        Ok(news) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": news
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "public",
    responses((status = 200, description = "Upcoming events", body = Vec<EventResponse>))
)]
pub async fn list_events(content_service: web::Data<ContentService>) -> Result<HttpResponse> {
    match content_service.upcoming_events(None).await {
        Ok(events) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": events
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/menu-items",
    tag = "public",
    responses((status = 200, description = "Active menu items in display order", body = Vec<MenuItemResponse>))
)]
pub async fn list_menu_items(menu_service: web::Data<MenuService>) -> Result<HttpResponse> {
    match menu_service.list_active().await {
        Ok(items) => {
            let items: Vec<MenuItemResponse> = items.into_iter().map(MenuItemResponse::from).collect();
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": items
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/settings/banner",
    tag = "public",
    responses((status = 200, description = "Running text banner", body = RunningTextSettings))
)]
pub async fn get_banner(settings_service: web::Data<SettingsService>) -> Result<HttpResponse> {
    match settings_service.load::<RunningTextSettings>().await {
        Ok(banner) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": banner
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/settings/payment",
    tag = "public",
    responses((status = 200, description = "QRIS image and bank account", body = PaymentSettings))
)]
pub async fn get_payment_info(settings_service: web::Data<SettingsService>) -> Result<HttpResponse> {
    match settings_service.load::<PaymentSettings>().await {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn public_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/campaigns", web::get().to(list_campaigns))
        .route("/campaigns/{id}", web::get().to(get_campaign))
        .route("/categories", web::get().to(list_categories))
        .route("/news", web::get().to(list_news))
        .route("/news/{id}", web::get().to(get_news))
        .route("/events", web::get().to(list_events))
        .route("/menu-items", web::get().to(list_menu_items))
        .route("/settings/banner", web::get().to(get_banner))
        .route("/settings/payment", web::get().to(get_payment_info));
}
