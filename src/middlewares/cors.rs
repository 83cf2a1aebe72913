use actix_cors::Cors;

/// The portal serves its own pages; cross-origin callers only get read access
/// to the public JSON API, without cookies.
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
