use crate::error::AppError;
use crate::external::QuranService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/quran/surah",
    tag = "quran",
    responses(
        (status = 200, description = "All 114 chapters", body = Vec<crate::models::SurahSummary>),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn list_surahs(quran_service: web::Data<QuranService>) -> Result<HttpResponse> {
    match quran_service.list_surahs().await {
        Ok(surahs) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": surahs
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/quran/surah/{number}",
    tag = "quran",
    params(("number" = String, Path, description = "Chapter number, 1 to 114")),
    responses(
        (status = 200, description = "Chapter with verses", body = crate::models::SurahDetail),
        (status = 404, description = "No such chapter")
    )
)]
pub async fn get_surah(
    quran_service: web::Data<QuranService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    // a non-numeric chapter is simply one that does not exist
    let Ok(number) = path.trim().parse::<u16>() else {
        return Ok(AppError::NotFound("Surah not found".to_string()).error_response());
    };
    match quran_service.get_surah(number).await {
        Ok(surah) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": surah
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn quran_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quran")
            .route("/surah", web::get().to(list_surahs))
            .route("/surah/{number}", web::get().to(get_surah)),
    );
}
