use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::utils::uploads::{
    CACHE_CONTROL_IMMUTABLE, content_type_for, ensure_canonical_within, resolve_under,
};
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError, Result, web};
use std::path::{Path, PathBuf};

/// Resolves a request tail to a readable file under `upload_dir`.
pub async fn locate_upload(upload_dir: &Path, tail: &str) -> AppResult<PathBuf> {
    let segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    let candidate = resolve_under(upload_dir, &segments)?;

    match tokio::fs::metadata(&candidate).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(AppError::NotFound("File not found".to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    ensure_canonical_within(upload_dir, &candidate)
}

#[utoipa::path(
    get,
    path = "/uploads/{path}",
    tag = "uploads",
    params(("path" = String, Path, description = "File path under the upload directory")),
    responses(
        (status = 200, description = "File contents"),
        (status = 403, description = "Path escapes the upload directory"),
        (status = 404, description = "No such file")
    )
)]
pub async fn serve_upload(
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let upload_dir = Path::new(&config.app.upload_dir);
    let file = match locate_upload(upload_dir, &path).await {
        Ok(file) => file,
        Err(e) => return Ok(e.error_response()),
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for(&file)))
            .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE))
            .body(bytes)),
        Err(e) => {
            log::error!("Reading upload {} failed: {e}", file.display());
            Ok(AppError::InternalError("Failed to read file".to_string()).error_response())
        }
    }
}

pub fn uploads_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/uploads/{path:.*}", web::get().to(serve_upload));
}
