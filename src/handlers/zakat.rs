use crate::models::ZakatRequest;
use crate::services::ZakatService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/zakat/calculate",
    tag = "zakat",
    request_body = ZakatRequest,
    responses(
        (status = 200, description = "Calculation result", body = crate::models::ZakatResult),
        (status = 400, description = "Negative or missing inputs")
    )
)]
pub async fn calculate(
    zakat_service: web::Data<ZakatService>,
    request: web::Json<ZakatRequest>,
) -> Result<HttpResponse> {
    match zakat_service.calculate(&request).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/zakat/prices",
    tag = "zakat",
    responses((status = 200, description = "Gold and rice prices used by the calculator"))
)]
pub async fn prices(zakat_service: web::Data<ZakatService>) -> Result<HttpResponse> {
    match zakat_service.prices().await {
        Ok(prices) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prices
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn zakat_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/zakat")
            .route("/calculate", web::post().to(calculate))
            .route("/prices", web::get().to(prices)),
    );
}
