use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpResponse, HttpServer, test, web};
use masjid_portal::config::{
    AppConfig, Config, DatabaseConfig, GoogleConfig, PrayerConfig, QuranConfig, ServerConfig,
    SessionConfig, SmtpConfig,
};
use masjid_portal::external::{
    GoogleOAuthService, Mailer, OAuthIntent, OAuthState, PrayerTimesService,
};
use masjid_portal::handlers::{self, auth::OAUTH_STATE_COOKIE};
use masjid_portal::services::AuthService;
use masjid_portal::entities::{UserRole, user_entity};
use masjid_portal::middlewares::{SESSION_COOKIE, SessionMiddleware};
use masjid_portal::utils::JwtService;
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

const UPSTREAM_TIMINGS: &str = r#"{
    "code": 200,
    "status": "OK",
    "data": {
        "timings": {
            "Imsak": "04:11", "Fajr": "04:21", "Sunrise": "05:33", "Dhuhr": "11:39",
            "Asr": "14:46", "Maghrib": "17:44", "Isha": "18:53"
        },
        "date": {
            "hijri": { "day": "4", "month": { "en": "Jumada al-Awwal" }, "year": "1448" }
        },
        "meta": { "timezone": "Asia/Jakarta" }
    }
}"#;

fn test_config(upload_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        session: SessionConfig {
            secret: "test-secret".to_string(),
            expires_in: 3600,
        },
        app: AppConfig {
            base_url: "http://localhost:3000".to_string(),
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            name: "Masjid Test".to_string(),
        },
        google: GoogleConfig::default(),
        smtp: SmtpConfig::default(),
        prayer: PrayerConfig::default(),
        quran: QuranConfig::default(),
    }
}

#[actix_web::test]
async fn prayer_times_without_latitude_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(PrayerTimesService::new(PrayerConfig::default())))
            .service(web::scope("/api").configure(handlers::prayer_config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/prayer-times?lng=106.8")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn prayer_times_are_reshaped_from_upstream() {
    let upstream = HttpServer::new(|| {
        App::new().route(
            "/timings/{date}",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("application/json")
                    .body(UPSTREAM_TIMINGS)
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = upstream.addrs()[0];
    let server = upstream.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let prayer = PrayerTimesService::new(PrayerConfig {
        base_url: format!("http://{addr}"),
        method: 20,
    });
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(prayer))
            .service(web::scope("/api").configure(handlers::prayer_config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/prayer-times?lat=-6.2&lng=106.8")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let jadwal = body["jadwal"].as_object().unwrap();
    for key in ["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"] {
        assert!(jadwal.contains_key(key), "missing {key}");
    }
    assert_eq!(body["jadwal"]["Fajr"], "04:21");
    assert_eq!(body["date"], "4 Jumada al-Awwal 1448 H");

    handle.stop(true).await;
}

#[actix_web::test]
async fn uploads_are_served_from_the_upload_dir_only() {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");
    std::fs::create_dir(&upload_dir).unwrap();
    std::fs::write(upload_dir.join("qris.png"), b"\x89PNG\r\n").unwrap();
    std::fs::write(root.path().join("secret.txt"), b"do not serve").unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_config(&upload_dir)))
            .configure(handlers::uploads_config),
    )
    .await;

    let req = test::TestRequest::get().uri("/uploads/qris.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    assert!(resp.headers().contains_key(header::CACHE_CONTROL));
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"\x89PNG\r\n");

    let req = test::TestRequest::get()
        .uri("/uploads/../secret.txt")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/uploads/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn member(role: UserRole) -> user_entity::Model {
    let now = Utc::now();
    user_entity::Model {
        id: 7,
        name: "Jamaah".to_string(),
        email: "jamaah@masjid.example".to_string(),
        password: None,
        role,
        is_verified: true,
        verification_code: None,
        verification_expires_at: None,
        verification_attempts: 0,
        is_contributor: false,
        avatar_url: None,
        created_at: now,
        updated_at: now,
    }
}

#[actix_web::test]
async fn admin_api_requires_an_admin_session() {
    let jwt = JwtService::new("test-secret", 3600);
    let member_token = jwt.generate_session_token(&member(UserRole::User)).unwrap();
    let app = test::init_service(
        App::new()
            .wrap(SessionMiddleware::new(jwt))
            .service(web::scope("/api").configure(handlers::admin_config))
            .route(
                "/api/campaigns",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;

    // the percent-encoded spelling routes into the same scope
    for uri in ["/api/admin/users", "/api/%61dmin/users", "/api/admin/settings"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let err = test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED,
            "{uri}"
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/%61dmin/users")
        .cookie(Cookie::new(SESSION_COOKIE, member_token))
        .to_request();
    let err = test::try_call_service(&app, req).await.err().unwrap();
    assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/campaigns").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

fn google_app_data(
    client_id: &str,
) -> (
    web::Data<Config>,
    web::Data<GoogleOAuthService>,
    web::Data<AuthService>,
) {
    let config = test_config(Path::new("uploads"));
    let google = GoogleOAuthService::new(
        GoogleConfig {
            client_id: client_id.to_string(),
            client_secret: "secret".to_string(),
        },
        &config.app.base_url,
    );
    let auth = AuthService::new(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        JwtService::new("test-secret", 3600),
        Mailer::new(SmtpConfig::default(), config.app.name.clone()),
    );
    (
        web::Data::new(config),
        web::Data::new(google),
        web::Data::new(auth),
    )
}

#[actix_web::test]
async fn google_start_redirects_with_state_and_nonce_cookie() {
    let (config, google, auth) = google_app_data("client-1.apps.example");
    let app = test::init_service(
        App::new()
            .app_data(config)
            .app_data(google)
            .app_data(auth)
            .service(web::scope("/api").configure(handlers::auth_config)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/auth/google?intent=register")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    let location = Url::parse(location).unwrap();
    let pairs: HashMap<String, String> = location.query_pairs().into_owned().collect();
    assert_eq!(pairs["client_id"], "client-1.apps.example");
    assert_eq!(
        pairs["redirect_uri"],
        "http://localhost:3000/api/auth/google/callback"
    );

    let state = OAuthState::decode(&pairs["state"]).unwrap();
    assert_eq!(state.intent, OAuthIntent::Register);

    let nonce_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == OAUTH_STATE_COOKIE)
        .unwrap();
    assert_eq!(nonce_cookie.value(), state.nonce);
    assert_eq!(nonce_cookie.path(), Some("/api/auth/google"));
    assert_eq!(nonce_cookie.http_only(), Some(true));
}

#[actix_web::test]
async fn google_start_rejects_unknown_intent_and_missing_client() {
    let (config, google, auth) = google_app_data("client-1.apps.example");
    let app = test::init_service(
        App::new()
            .app_data(config)
            .app_data(google)
            .app_data(auth)
            .service(web::scope("/api").configure(handlers::auth_config)),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/api/auth/google?intent=bogus")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let (config, google, auth) = google_app_data("");
    let app = test::init_service(
        App::new()
            .app_data(config)
            .app_data(google)
            .app_data(auth)
            .service(web::scope("/api").configure(handlers::auth_config)),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/api/auth/google?intent=login")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::LOCATION).is_none());
}

#[actix_web::test]
async fn google_callback_requires_the_matching_nonce() {
    let (config, google, auth) = google_app_data("client-1.apps.example");
    let app = test::init_service(
        App::new()
            .app_data(config)
            .app_data(google)
            .app_data(auth)
            .service(web::scope("/api").configure(handlers::auth_config)),
    )
    .await;
    let state = OAuthState {
        intent: OAuthIntent::Login,
        nonce: "issued-nonce".to_string(),
    }
    .encode()
    .unwrap();
    let uri = format!("/api/auth/google/callback?code=abc&state={state}");

    let req = test::TestRequest::get()
        .uri(&uri)
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "someone-elses-nonce"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/auth/google/callback?code=abc&state=not-base64!")
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "issued-nonce"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
