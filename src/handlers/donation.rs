use crate::middlewares::{current_user, require_user};
use crate::models::*;
use crate::services::DonationService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "donations",
    request_body = DonationRequest,
    responses(
        (status = 201, description = "Donation recorded as pending", body = TransactionResponse),
        (status = 400, description = "Invalid amount or target"),
        (status = 404, description = "Campaign or menu item not found")
    )
)]
pub async fn create_donation(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
    request: web::Json<DonationRequest>,
) -> Result<HttpResponse> {
    let donor = current_user(&req);
    match donation_service
        .submit(request.into_inner(), donor.as_ref())
        .await
    {
        Ok(transaction) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": transaction
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/donations/mine",
    tag = "donations",
    responses(
        (status = 200, description = "Donations made by the signed-in user", body = Vec<TransactionResponse>),
        (status = 401, description = "No session")
    )
)]
pub async fn my_donations(
    donation_service: web::Data<DonationService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match donation_service.list_for_user(user.id).await {
        Ok(donations) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": donations
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn donation_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/donations")
            .route("", web::post().to(create_donation))
            .route("/mine", web::get().to(my_donations)),
    );
}
