use crate::services::SitemapService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/sitemap.xml",
    tag = "seo",
    responses((status = 200, description = "sitemaps.org urlset", content_type = "application/xml"))
)]
pub async fn sitemap_xml(sitemap_service: web::Data<SitemapService>) -> Result<HttpResponse> {
    match sitemap_service.xml().await {
        Ok(xml) => Ok(HttpResponse::Ok()
            .content_type("application/xml; charset=utf-8")
            .body(xml)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "seo",
    responses((status = 200, description = "Crawler rules", content_type = "text/plain"))
)]
pub async fn robots_txt(sitemap_service: web::Data<SitemapService>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(sitemap_service.robots()))
}

pub fn sitemap_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/sitemap.xml", web::get().to(sitemap_xml))
        .route("/robots.txt", web::get().to(robots_txt));
}
