//! Server-rendered HTML routes. Failures render an error page instead of the JSON body.

use crate::config::Config;
use crate::entities::TransactionStatus;
use crate::error::AppError;
use crate::external::{Coordinates, PrayerTimesService, QuranService};
use crate::handlers::auth::{expired_cookie, session_cookie};
use crate::middlewares::{SESSION_COOKIE, current_user};
use crate::models::*;
use crate::services::*;
use crate::views::account::{
    FormNotice, login_page, profile_page, register_page, verify_page,
};
use crate::views::admin::{AdminDashboard, dashboard_page};
use crate::views::campaigns::{campaign_detail_page, campaign_list_page, donation_thanks_page};
use crate::views::content::{events_page, menu_page, news_detail_page, news_list_page};
use crate::views::error::error_page;
use crate::views::home::{HomeData, home_page};
use crate::views::prayer::prayer_times_page;
use crate::views::quran::{surah_list_page, surah_page};
use crate::views::zakat::zakat_page;
use crate::views::{PageContext, html_response, html_status, redirect};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use chrono::Local;
use serde::Deserialize;
use std::collections::HashMap;
use url::form_urlencoded;

const HOME_CAMPAIGNS: usize = 3;
const HOME_NEWS: u64 = 3;
const HOME_EVENTS: u64 = 3;

/// Chrome shared by every page. A menu that fails to load only costs the navigation.
async fn page_context(req: &HttpRequest, config: &Config, menu_service: &MenuService) -> PageContext {
    let menu = match menu_service.list_active().await {
        Ok(menu) => menu,
        Err(e) => {
            log::error!("Loading menu items failed: {e}");
            Vec::new()
        }
    };
    PageContext {
        app_name: config.app.name.clone(),
        base_url: config.app.base_url.clone(),
        path: req.path().to_string(),
        user: current_user(req),
        menu,
    }
}

fn error_html(ctx: &PageContext, error: AppError) -> HttpResponse {
    let (status, message) = error.public_parts();
    html_status(status, error_page(ctx, status, &message))
}

pub async fn home(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    campaign_service: web::Data<CampaignService>,
    content_service: web::Data<ContentService>,
    settings_service: web::Data<SettingsService>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let banner = match settings_service.load::<RunningTextSettings>().await {
        Ok(banner) => banner,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let mut campaigns = match campaign_service.list_active(None).await {
        Ok(campaigns) => campaigns,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    campaigns.truncate(HOME_CAMPAIGNS);
    let news = match content_service.latest_news(HOME_NEWS).await {
        Ok(news) => news,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let events = match content_service.upcoming_events(Some(HOME_EVENTS)).await {
        Ok(events) => events,
        Err(e) => return Ok(error_html(&ctx, e)),
    };

    Ok(html_response(home_page(
        &ctx,
        HomeData {
            banner: &banner,
            campaigns: &campaigns,
            news: &news,
            events: &events,
        },
    )))
}

pub async fn campaigns(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    campaign_service: web::Data<CampaignService>,
    query: web::Query<CampaignQuery>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let selected = query.category.as_deref().filter(|c| !c.is_empty());
    let campaigns = match campaign_service.list_active(selected).await {
        Ok(campaigns) => campaigns,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let categories = match campaign_service.list_categories().await {
        Ok(categories) => categories,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    Ok(html_response(campaign_list_page(
        &ctx,
        &campaigns,
        &categories,
        selected,
    )))
}

pub async fn campaign_detail(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    campaign_service: web::Data<CampaignService>,
    settings_service: web::Data<SettingsService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let campaign = match campaign_service.get(path.into_inner()).await {
        Ok(campaign) => campaign,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let payment = match settings_service.load::<PaymentSettings>().await {
        Ok(payment) => payment,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    Ok(html_response(campaign_detail_page(
        &ctx, &campaign, &payment, None,
    )))
}

pub async fn donate(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    campaign_service: web::Data<CampaignService>,
    donation_service: web::Data<DonationService>,
    settings_service: web::Data<SettingsService>,
    form: web::Form<DonationForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let campaign_id = form.campaign_id;
    let donor = current_user(&req);

    let submitted = match form.into_request() {
        Ok(request) => donation_service.submit(request, donor.as_ref()).await,
        Err(e) => Err(e),
    };
    let error = match submitted {
        Ok(transaction) => return Ok(redirect(&format!("/donate/thanks/{}", transaction.id))),
        Err(e) => e,
    };

    let ctx = page_context(&req, &config, &menu_service).await;
    // validation problems on a campaign go back to its form
    if let (Some(id), AppError::ValidationError(message)) = (campaign_id, &error) {
        let campaign = campaign_service.get(id).await;
        let payment = settings_service.load::<PaymentSettings>().await;
        if let (Ok(campaign), Ok(payment)) = (campaign, payment) {
            return Ok(html_status(
                StatusCode::BAD_REQUEST,
                campaign_detail_page(&ctx, &campaign, &payment, Some(message)),
            ));
        }
    }
    Ok(error_html(&ctx, error))
}

pub async fn donation_thanks(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    donation_service: web::Data<DonationService>,
    settings_service: web::Data<SettingsService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let transaction = match donation_service.get(path.into_inner()).await {
        Ok(transaction) => transaction,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let payment = match settings_service.load::<PaymentSettings>().await {
        Ok(payment) => payment,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    Ok(html_response(donation_thanks_page(
        &ctx,
        &transaction,
        &payment,
    )))
}

pub async fn zakat_form(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    zakat_service: web::Data<ZakatService>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    match zakat_service.prices().await {
        Ok(prices) => Ok(html_response(zakat_page(&ctx, &prices, None, None))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn zakat_calculate(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    zakat_service: web::Data<ZakatService>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let prices = match zakat_service.prices().await {
        Ok(prices) => prices,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let result = ZakatRequest::from_form(&form).and_then(|request| calculate_zakat(&request, &prices));
    match result {
        Ok(result) => Ok(html_response(zakat_page(&ctx, &prices, Some(&result), None))),
        Err(AppError::ValidationError(message)) => Ok(html_status(
            StatusCode::BAD_REQUEST,
            zakat_page(&ctx, &prices, None, Some(&message)),
        )),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn prayer_times(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    prayer_service: web::Data<PrayerTimesService>,
    query: web::Query<PrayerTimesQuery>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let lat = query.lat.as_deref().unwrap_or("");
    let lng = query.lng.as_deref().unwrap_or("");
    if lat.is_empty() && lng.is_empty() {
        return Ok(html_response(prayer_times_page(&ctx, lat, lng, None, None)));
    }

    let result = match Coordinates::parse(Some(lat), Some(lng)) {
        Ok(coords) => {
            prayer_service
                .get_timings(coords, Local::now().date_naive())
                .await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(times) => Ok(html_response(prayer_times_page(
            &ctx,
            lat,
            lng,
            Some(&times),
            None,
        ))),
        Err(e) => {
            let (status, message) = e.public_parts();
            Ok(html_status(
                status,
                prayer_times_page(&ctx, lat, lng, None, Some(&message)),
            ))
        }
    }
}

pub async fn quran_index(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    quran_service: web::Data<QuranService>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    match quran_service.list_surahs().await {
        Ok(surahs) => Ok(html_response(surah_list_page(&ctx, &surahs))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn quran_surah(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    quran_service: web::Data<QuranService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let Ok(number) = path.trim().parse::<u16>() else {
        return Ok(error_html(
            &ctx,
            AppError::NotFound("Surah not found".to_string()),
        ));
    };
    match quran_service.get_surah(number).await {
        Ok(surah) => Ok(html_response(surah_page(&ctx, &surah))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn news(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    content_service: web::Data<ContentService>,
    query: web::Query<NewsQuery>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    match content_service.list_news(&query).await {
        Ok(page) => Ok(html_response(news_list_page(&ctx, &page))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn news_detail(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    content_service: web::Data<ContentService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    match content_service.get_news(path.into_inner()).await {
        Ok(item) => Ok(html_response(news_detail_page(&ctx, &item))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn events(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    content_service: web::Data<ContentService>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    match content_service.upcoming_events(None).await {
        Ok(events) => Ok(html_response(events_page(&ctx, &events))),
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn menu_item_page(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    settings_service: web::Data<SettingsService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let item = match menu_service.get_page(&path).await {
        Ok(item) => item,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let payment = match settings_service.load::<PaymentSettings>().await {
        Ok(payment) => payment,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    Ok(html_response(menu_page(&ctx, &item, &payment)))
}

// Accounts

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub email: Option<String>,
}

fn login_error_message(code: &str) -> &'static str {
    match code {
        "not_registered" => "Email ini belum terdaftar. Silakan daftar terlebih dahulu.",
        "oauth_cancelled" => "Masuk dengan Google dibatalkan.",
        _ => "Masuk dengan Google gagal. Silakan coba lagi.",
    }
}

fn signed_in_redirect(config: &Config, signed_in: SignedIn) -> Result<HttpResponse> {
    let mut response = redirect("/");
    response.add_cookie(&session_cookie(
        signed_in.token,
        signed_in.response.expires_in,
        config.app.is_https(),
    ))?;
    Ok(response)
}

pub async fn login_form(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse> {
    if current_user(&req).is_some() {
        return Ok(redirect("/profile"));
    }
    let ctx = page_context(&req, &config, &menu_service).await;
    let messages = match query.error.as_deref() {
        Some(code) => FormNotice::error(login_error_message(code)),
        None => FormNotice::default(),
    };
    Ok(html_response(login_page(
        &ctx,
        query.email.as_deref().unwrap_or(""),
        &messages,
    )))
}

pub async fn login_submit(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    form: web::Form<LoginRequest>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let email = form.email.clone();
    match auth_service.login(form).await {
        Ok(signed_in) => signed_in_redirect(&config, signed_in),
        Err(e) => {
            let ctx = page_context(&req, &config, &menu_service).await;
            let (status, message) = e.public_parts();
            Ok(html_status(
                status,
                login_page(&ctx, &email, &FormNotice::error(message)),
            ))
        }
    }
}

pub async fn register_form(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    Ok(html_response(register_page(
        &ctx,
        "",
        "",
        &FormNotice::default(),
    )))
}

/// Where to send someone who was just mailed a verification code.
fn verify_location(email: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .append_pair("sent", "1")
        .finish();
    format!("/verify?{query}")
}

pub async fn register_submit(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    form: web::Form<RegisterRequest>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let (name, email) = (form.name.clone(), form.email.clone());
    match auth_service.register(form).await {
        Ok(registered) => Ok(redirect(&verify_location(&registered.email))),
        Err(e) => {
            let ctx = page_context(&req, &config, &menu_service).await;
            let (status, message) = e.public_parts();
            Ok(html_status(
                status,
                register_page(&ctx, &name, &email, &FormNotice::error(message)),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub email: Option<String>,
    pub sent: Option<String>,
}

pub async fn verify_form(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    query: web::Query<VerifyQuery>,
) -> Result<HttpResponse> {
    let ctx = page_context(&req, &config, &menu_service).await;
    let messages = if query.sent.is_some() {
        FormNotice::info(format!(
            "Kode verifikasi telah dikirim dan berlaku {VERIFICATION_CODE_TTL_MINUTES} menit."
        ))
    } else {
        FormNotice::default()
    };
    Ok(html_response(verify_page(
        &ctx,
        query.email.as_deref().unwrap_or(""),
        &messages,
    )))
}

pub async fn verify_submit(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    form: web::Form<VerifyEmailRequest>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let email = form.email.clone();
    match auth_service.verify_email(form).await {
        Ok(signed_in) => signed_in_redirect(&config, signed_in),
        Err(e) => {
            let ctx = page_context(&req, &config, &menu_service).await;
            let (status, message) = e.public_parts();
            Ok(html_status(
                status,
                verify_page(&ctx, &email, &FormNotice::error(message)),
            ))
        }
    }
}

pub async fn verify_resend(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    auth_service: web::Data<AuthService>,
    form: web::Form<ResendCodeRequest>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let email = form.email.clone();
    match auth_service.resend_code(form).await {
        Ok(_) => Ok(redirect(&verify_location(&email))),
        Err(e) => {
            let ctx = page_context(&req, &config, &menu_service).await;
            let (status, message) = e.public_parts();
            Ok(html_status(
                status,
                verify_page(&ctx, &email, &FormNotice::error(message)),
            ))
        }
    }
}

pub async fn logout() -> Result<HttpResponse> {
    let mut response = redirect("/");
    response.add_cookie(&expired_cookie(SESSION_COOKIE))?;
    Ok(response)
}

pub async fn profile(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    user_service: web::Data<UserService>,
    donation_service: web::Data<DonationService>,
) -> Result<HttpResponse> {
    let Some(session) = current_user(&req) else {
        return Ok(redirect("/login"));
    };
    let ctx = page_context(&req, &config, &menu_service).await;
    let user = match user_service.get_profile(session.id).await {
        Ok(user) => user,
        // account removed while the cookie was still valid
        Err(AppError::NotFound(_)) => return logout().await,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    let donations = match donation_service.list_for_user(session.id).await {
        Ok(donations) => donations,
        Err(e) => return Ok(error_html(&ctx, e)),
    };
    Ok(html_response(profile_page(&ctx, &user, &donations)))
}

// Admin

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub saved: Option<String>,
}

pub async fn admin_dashboard(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    campaign_service: web::Data<CampaignService>,
    donation_service: web::Data<DonationService>,
    settings_service: web::Data<SettingsService>,
    user_service: web::Data<UserService>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse> {
    if !current_user(&req).is_some_and(|u| u.is_admin()) {
        return Ok(redirect("/login"));
    }
    let ctx = page_context(&req, &config, &menu_service).await;

    let pending_query = TransactionQuery {
        status: Some(TransactionStatus::Pending),
        page: Some(1),
        per_page: Some(50),
    };
    let loaded = async {
        Ok::<_, AppError>(AdminDashboard {
            pending: donation_service.admin_list(&pending_query).await?,
            campaigns: campaign_service.list_all().await?,
            menu: menu_service.list_all().await?,
            settings: settings_service.list_all().await?,
            users_total: user_service
                .admin_list(&PaginationParams::new(Some(1), Some(1)))
                .await?
                .total,
        })
    }
    .await;

    match loaded {
        Ok(data) => {
            let message = query
                .saved
                .as_deref()
                .map(|key| format!("Pengaturan {key} disimpan."));
            Ok(html_response(dashboard_page(&ctx, &data, message.as_deref())))
        }
        Err(e) => Ok(error_html(&ctx, e)),
    }
}

pub async fn admin_save_setting(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
    settings_service: web::Data<SettingsService>,
    form: web::Form<UpsertSettingRequest>,
) -> Result<HttpResponse> {
    if !current_user(&req).is_some_and(|u| u.is_admin()) {
        return Ok(redirect("/login"));
    }
    match settings_service.upsert(form.into_inner()).await {
        Ok(saved) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("saved", &saved.key)
                .finish();
            Ok(redirect(&format!("/admin?{query}")))
        }
        Err(e) => {
            let ctx = page_context(&req, &config, &menu_service).await;
            Ok(error_html(&ctx, e))
        }
    }
}

pub async fn not_found(
    req: HttpRequest,
    config: web::Data<Config>,
    menu_service: web::Data<MenuService>,
) -> Result<HttpResponse> {
    if req.path().starts_with("/api/") {
        return Ok(actix_web::ResponseError::error_response(&AppError::NotFound(
            "Route not found".to_string(),
        )));
    }
    let ctx = page_context(&req, &config, &menu_service).await;
    Ok(error_html(
        &ctx,
        AppError::NotFound("Halaman yang Anda cari tidak ada.".to_string()),
    ))
}

pub fn pages_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/campaigns", web::get().to(campaigns))
        .route("/campaigns/{id}", web::get().to(campaign_detail))
        .route("/donate", web::post().to(donate))
        .route("/donate/thanks/{id}", web::get().to(donation_thanks))
        .route("/zakat", web::get().to(zakat_form))
        .route("/zakat", web::post().to(zakat_calculate))
        .route("/prayer-times", web::get().to(prayer_times))
        .route("/quran", web::get().to(quran_index))
        .route("/quran/{number}", web::get().to(quran_surah))
        .route("/news", web::get().to(news))
        .route("/news/{id}", web::get().to(news_detail))
        .route("/events", web::get().to(events))
        .route("/p/{slug}", web::get().to(menu_item_page))
        .route("/login", web::get().to(login_form))
        .route("/login", web::post().to(login_submit))
        .route("/register", web::get().to(register_form))
        .route("/register", web::post().to(register_submit))
        .route("/verify", web::get().to(verify_form))
        .route("/verify", web::post().to(verify_submit))
        .route("/verify/resend", web::post().to(verify_resend))
        .route("/logout", web::get().to(logout))
        .route("/profile", web::get().to(profile))
        .route("/admin", web::get().to(admin_dashboard))
        .route("/admin/settings", web::post().to(admin_save_setting));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_codes() {
        assert!(login_error_message("not_registered").contains("belum terdaftar"));
        assert!(login_error_message("oauth_cancelled").contains("dibatalkan"));
        assert!(login_error_message("anything").contains("gagal"));
    }

    #[test]
    fn test_verify_location_encodes_email() {
        assert_eq!(
            verify_location("ahmad+infaq@example.com"),
            "/verify?email=ahmad%2Binfaq%40example.com&sent=1"
        );
    }
}
