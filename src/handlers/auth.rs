use crate::config::Config;
use crate::error::AppError;
use crate::external::{GoogleOAuthService, OAuthIntent, OAuthState};
use crate::middlewares::{SESSION_COOKIE, require_user};
use crate::models::*;
use crate::services::{AuthService, OAuthOutcome, SignedIn};
use crate::utils::generate_nonce;
use crate::views::redirect;
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Deserialize;
use serde_json::json;

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_MAX_AGE_SECONDS: i64 = 600;

pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

pub fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::ZERO)
        .finish()
}

fn signed_in_json(config: &Config, signed_in: SignedIn) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session_cookie(
            signed_in.token,
            signed_in.response.expires_in,
            config.app.is_https(),
        ))
        .json(json!({
            "success": true,
            "data": signed_in.response
        }))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, verification code sent", body = RegisterResponse),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 500, description = "Mail delivery failed")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Verification code sent"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = "auth",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified and signed in", body = AuthResponse),
        (status = 400, description = "Wrong or expired code")
    )
)]
pub async fn verify(
    auth_service: web::Data<AuthService>,
    config: web::Data<Config>,
    request: web::Json<VerifyEmailRequest>,
) -> Result<HttpResponse> {
    match auth_service.verify_email(request.into_inner()).await {
        Ok(signed_in) => Ok(signed_in_json(&config, signed_in)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-code",
    tag = "auth",
    request_body = ResendCodeRequest,
    responses(
        (status = 200, description = "New code sent", body = RegisterResponse),
        (status = 400, description = "Already verified or asked too soon"),
        (status = 404, description = "No pending registration")
    )
)]
pub async fn resend_code(
    auth_service: web::Data<AuthService>,
    request: web::Json<ResendCodeRequest>,
) -> Result<HttpResponse> {
    match auth_service.resend_code(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Wrong credentials or unverified email")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    config: web::Data<Config>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(signed_in) => Ok(signed_in_json(&config, signed_in)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(expired_cookie(SESSION_COOKIE))
        .json(json!({
            "success": true,
            "message": "Signed out"
        })))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No session")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let user = match require_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match auth_service.current_user(&user).await {
        Ok(profile) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": profile
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct GoogleStartQuery {
    pub intent: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/auth/google",
    tag = "auth",
    params(("intent" = Option<String>, Query, description = "login (default) or register")),
    responses(
        (status = 302, description = "Redirect to Google"),
        (status = 400, description = "Unknown intent"),
        (status = 500, description = "Google sign-in is not configured")
    )
)]
pub async fn google_start(
    google: web::Data<GoogleOAuthService>,
    config: web::Data<Config>,
    query: web::Query<GoogleStartQuery>,
) -> Result<HttpResponse> {
    let intent = match OAuthIntent::parse(query.intent.as_deref()) {
        Ok(intent) => intent,
        Err(e) => return Ok(e.error_response()),
    };
    let state = OAuthState {
        intent,
        nonce: generate_nonce(32),
    };
    let url = match google.authorization_url(&state) {
        Ok(url) => url,
        Err(e) => return Ok(e.error_response()),
    };

    let nonce_cookie = Cookie::build(OAUTH_STATE_COOKIE, state.nonce)
        .path("/api/auth/google")
        .http_only(true)
        .secure(config.app.is_https())
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(OAUTH_STATE_MAX_AGE_SECONDS))
        .finish();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .cookie(nonce_cookie)
        .finish())
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    tag = "auth",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by /api/auth/google")
    ),
    responses(
        (status = 303, description = "Signed in, or sent back to the login page"),
        (status = 400, description = "State mismatch or missing code")
    )
)]
pub async fn google_callback(
    google: web::Data<GoogleOAuthService>,
    auth_service: web::Data<AuthService>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<GoogleCallbackQuery>,
) -> Result<HttpResponse> {
    if let Some(error) = &query.error {
        log::warn!("Google sign-in was cancelled: {error}");
        return Ok(redirect("/login?error=oauth_cancelled"));
    }

    let state = match query.state.as_deref().map(OAuthState::decode) {
        Some(Ok(state)) => state,
        Some(Err(e)) => return Ok(e.error_response()),
        None => {
            return Ok(AppError::ValidationError("Missing OAuth state".to_string()).error_response());
        }
    };
    let expected_nonce = req.cookie(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    if expected_nonce.as_deref() != Some(state.nonce.as_str()) {
        log::warn!("OAuth state nonce mismatch");
        return Ok(AppError::ValidationError("OAuth state mismatch".to_string()).error_response());
    }
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(AppError::ValidationError("Missing authorization code".to_string()).error_response());
    };

    let outcome = match google.fetch_profile(code).await {
        Ok(profile) => auth_service.oauth_sign_in(profile, state.intent).await,
        Err(e) => Err(e),
    };

    let mut clear_state = expired_cookie(OAUTH_STATE_COOKIE);
    clear_state.set_path("/api/auth/google");

    match outcome {
        Ok(OAuthOutcome::SignedIn(signed_in)) => {
            let mut response = redirect("/");
            response.add_cookie(&session_cookie(
                signed_in.token,
                signed_in.response.expires_in,
                config.app.is_https(),
            ))?;
            response.add_cookie(&clear_state)?;
            Ok(response)
        }
        Ok(OAuthOutcome::NotRegistered) => {
            let mut response = redirect("/login?error=not_registered");
            response.add_cookie(&clear_state)?;
            Ok(response)
        }
        Err(e) => {
            let (_, message) = e.public_parts();
            log::warn!("Google sign-in failed: {message}");
            let mut response = redirect("/login?error=oauth_failed");
            response.add_cookie(&clear_state)?;
            Ok(response)
        }
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/verify", web::post().to(verify))
            .route("/resend-code", web::post().to(resend_code))
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(me))
            .route("/google", web::get().to(google_start))
            .route("/google/callback", web::get().to(google_callback)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("token".to_string(), 3600, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));
    }

    #[test]
    fn test_expired_cookie_is_empty() {
        let cookie = expired_cookie(SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
