use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{MenuType, PaymentMethod, TransactionStatus, UserRole};
use crate::handlers;
use crate::middlewares::SESSION_COOKIE;
use crate::models::*;
use crate::services::{PaymentSettings, RunningTextSettings, ZakatSettings};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::verify,
        handlers::auth::resend_code,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::google_start,
        handlers::auth::google_callback,
        handlers::prayer::get_prayer_times,
        handlers::quran::list_surahs,
        handlers::quran::get_surah,
        handlers::public::list_campaigns,
        handlers::public::get_campaign,
        handlers::public::list_categories,
        handlers::public::list_news,
        handlers::public::get_news,
        handlers::public::list_events,
        handlers::public::list_menu_items,
        handlers::public::get_banner,
        handlers::public::get_payment_info,
        handlers::zakat::calculate,
        handlers::zakat::prices,
        handlers::donation::create_donation,
        handlers::donation::my_donations,
        handlers::admin::list_campaigns,
        handlers::admin::create_campaign,
        handlers::admin::update_campaign,
        handlers::admin::delete_campaign,
        handlers::admin::list_categories,
        handlers::admin::create_category,
        handlers::admin::update_category,
        handlers::admin::delete_category,
        handlers::admin::list_news,
        handlers::admin::create_news,
        handlers::admin::update_news,
        handlers::admin::delete_news,
        handlers::admin::list_events,
        handlers::admin::create_event,
        handlers::admin::update_event,
        handlers::admin::delete_event,
        handlers::admin::list_menu_items,
        handlers::admin::create_menu_item,
        handlers::admin::update_menu_item,
        handlers::admin::delete_menu_item,
        handlers::admin::reorder_menu_items,
        handlers::admin::list_settings,
        handlers::admin::upsert_setting,
        handlers::admin::delete_setting,
        handlers::admin::list_transactions,
        handlers::admin::confirm_transaction,
        handlers::admin::reject_transaction,
        handlers::admin::list_users,
        handlers::admin::update_user,
        handlers::admin::upload_file,
        handlers::uploads::serve_upload,
        handlers::sitemap::sitemap_xml,
        handlers::sitemap::robots_txt,
    ),
    components(
        schemas(
            UserRole,
            MenuType,
            PaymentMethod,
            TransactionStatus,
            RegisterRequest,
            RegisterResponse,
            VerifyEmailRequest,
            ResendCodeRequest,
            LoginRequest,
            UserResponse,
            AuthResponse,
            UpdateUserRequest,
            PaginationParams,
            PrayerTimesQuery,
            PrayerTimesResponse,
            Jadwal,
            SurahSummary,
            Verse,
            SurahDetail,
            CategoryResponse,
            CampaignResponse,
            CampaignQuery,
            CreateCampaignRequest,
            UpdateCampaignRequest,
            CreateCategoryRequest,
            NewsResponse,
            NewsQuery,
            CreateNewsRequest,
            UpdateNewsRequest,
            EventResponse,
            CreateEventRequest,
            UpdateEventRequest,
            MenuItemResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            ReorderMenuItemsRequest,
            SettingResponse,
            UpsertSettingRequest,
            RunningTextSettings,
            PaymentSettings,
            ZakatSettings,
            ZakatKind,
            ZakatRequest,
            ZakatResult,
            DonationRequest,
            TransactionResponse,
            TransactionQuery,
        )
    ),
    tags(
        (name = "auth", description = "Registration, email verification, sessions and Google sign-in"),
        (name = "prayer", description = "Daily prayer times"),
        (name = "quran", description = "Quran chapters and verses"),
        (name = "public", description = "Campaigns, news, events, menu and public settings"),
        (name = "zakat", description = "Zakat calculator"),
        (name = "donations", description = "Donation intake"),
        (name = "admin", description = "Administration, admin session required"),
        (name = "uploads", description = "Uploaded files"),
        (name = "seo", description = "Sitemap and robots.txt")
    ),
    modifiers(&SessionCookieAddon),
    info(
        title = "Masjid Portal API",
        version = "0.1.0",
        description = "JSON API behind the mosque portal"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
