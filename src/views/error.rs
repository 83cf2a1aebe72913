use crate::views::layout::{PageContext, page};
use actix_web::http::StatusCode;
use maud::{Markup, html};

/// Page shown for HTML routes that fail; API routes keep their JSON body.
pub fn error_page(ctx: &PageContext, status: StatusCode, message: &str) -> Markup {
    let title = match status {
        StatusCode::NOT_FOUND => "Halaman tidak ditemukan",
        StatusCode::FORBIDDEN => "Akses ditolak",
        s if s.is_client_error() => "Permintaan tidak valid",
        _ => "Terjadi kesalahan",
    };
    let content = html! {
        h1 { (status.as_u16()) " · " (title) }
        p { (message) }
        p { a href="/" { "Kembali ke beranda" } }
    };
    page(ctx, title, content)
}
