use crate::external::{Coordinates, PrayerTimesService};
use crate::models::PrayerTimesQuery;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::Local;

/// Unlike the rest of the API this endpoint answers with the bare schedule,
/// which is what the home page widget reads.
#[utoipa::path(
    get,
    path = "/api/prayer-times",
    tag = "prayer",
    params(
        ("lat" = String, Query, description = "Latitude"),
        ("lng" = String, Query, description = "Longitude")
    ),
    responses(
        (status = 200, description = "Today's prayer times", body = crate::models::PrayerTimesResponse),
        (status = 400, description = "Missing or invalid coordinates"),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn get_prayer_times(
    prayer_service: web::Data<PrayerTimesService>,
    query: web::Query<PrayerTimesQuery>,
) -> Result<HttpResponse> {
    let coords = match Coordinates::parse(query.lat.as_deref(), query.lng.as_deref()) {
        Ok(coords) => coords,
        Err(e) => return Ok(e.error_response()),
    };
    match prayer_service
        .get_timings(coords, Local::now().date_naive())
        .await
    {
        Ok(times) => Ok(HttpResponse::Ok().json(times)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prayer_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/prayer-times", web::get().to(get_prayer_times));
}
