use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local; // timestamp in log lines

use masjid_portal::{
    AppError,
    config::Config,
    database::{create_pool, run_migrations},
    external::{GoogleOAuthService, Mailer, PrayerTimesService, QuranService},
    handlers,
    middlewares::{SessionMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.session.secret, config.session.expires_in);

    // Upstream adapters
    let mailer = Mailer::new(config.smtp.clone(), config.app.name.clone());
    let google_service = GoogleOAuthService::new(config.google.clone(), &config.app.base_url);
    let prayer_service = PrayerTimesService::new(config.prayer.clone());
    let quran_service = QuranService::new(config.quran.clone());
    if config.google.client_id.is_empty() {
        log::warn!("Google sign-in is disabled: google.client_id is not set");
    }
    if config.smtp.host.is_empty() {
        log::warn!("Email verification is disabled: smtp.host is not set");
    }

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone(), mailer);
    let user_service = UserService::new(pool.clone());
    let campaign_service = CampaignService::new(pool.clone());
    let content_service = ContentService::new(pool.clone());
    let menu_service = MenuService::new(pool.clone());
    let settings_service = SettingsService::new(pool.clone());
    let donation_service = DonationService::new(pool.clone());
    let zakat_service = ZakatService::new(settings_service.clone());
    let sitemap_service = SitemapService::new(
        config.app.base_url.clone(),
        campaign_service.clone(),
        content_service.clone(),
        menu_service.clone(),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );
    let bind = (config.server.host.clone(), config.server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(content_service.clone()))
            .app_data(web::Data::new(menu_service.clone()))
            .app_data(web::Data::new(settings_service.clone()))
            .app_data(web::Data::new(donation_service.clone()))
            .app_data(web::Data::new(zakat_service.clone()))
            .app_data(web::Data::new(sitemap_service.clone()))
            .app_data(web::Data::new(google_service.clone()))
            .app_data(web::Data::new(prayer_service.clone()))
            .app_data(web::Data::new(quran_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api")
                    .configure(handlers::auth_config)
                    .configure(handlers::prayer_config)
                    .configure(handlers::quran_config)
                    .configure(handlers::public_config)
                    .configure(handlers::zakat_config)
                    .configure(handlers::donation_config)
                    .configure(handlers::admin_config),
            )
            .configure(handlers::uploads_config)
            .configure(handlers::sitemap_config)
            .configure(handlers::pages_config)
            .default_service(web::to(handlers::not_found))
    })
    .bind(bind)?
    .run()
    .await
}
