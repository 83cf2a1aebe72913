//! Server-rendered pages built with maud

pub mod account;
pub mod admin;
pub mod campaigns;
pub mod components;
pub mod content;
pub mod error;
pub mod home;
pub mod icons;
pub mod layout;
pub mod prayer;
pub mod quran;
pub mod zakat;

pub use layout::PageContext;

use actix_web::HttpResponse;
use actix_web::http::{StatusCode, header};
use maud::Markup;

pub fn html_response(markup: Markup) -> HttpResponse {
    html_status(StatusCode::OK, markup)
}

pub fn html_status(status: StatusCode, markup: Markup) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(markup.into_string())
}

/// 303 so a POSTed form is followed by a GET.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
