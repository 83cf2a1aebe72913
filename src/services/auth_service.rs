use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{GoogleProfile, Mailer, OAuthIntent};
use crate::models::*;
use crate::utils::*;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

/// Minutes an emailed verification code stays valid.
pub const VERIFICATION_CODE_TTL_MINUTES: i64 = 15;
/// Minimum seconds between two codes for the same address.
pub const RESEND_INTERVAL_SECONDS: i64 = 60;
/// Wrong guesses allowed per code; after that only a fresh code works.
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 5;

/// A user who just signed in, plus the session token to put in the cookie.
#[derive(Debug)]
pub struct SignedIn {
    pub response: AuthResponse,
    pub token: String,
}

#[derive(Debug)]
pub enum OAuthOutcome {
    SignedIn(SignedIn),
    /// `login` intent for an address that has no account yet.
    NotRegistered,
}

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    mailer: Mailer,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService, mailer: Mailer) -> Self {
        Self {
            pool,
            jwt_service,
            mailer,
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    fn issue(&self, user: users::Model) -> AppResult<SignedIn> {
        let token = self.jwt_service.generate_session_token(&user)?;
        Ok(SignedIn {
            response: AuthResponse {
                user: UserResponse::from(user),
                expires_in: self.jwt_service.get_session_expires_in(),
            },
            token,
        })
    }

    fn fresh_code() -> (String, DateTime<Utc>) {
        (
            generate_six_digit_code(),
            Utc::now() + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES),
        )
    }

    async fn send_code(&self, user: &users::Model, code: &str) -> AppResult<RegisterResponse> {
        self.mailer
            .send_verification_code(&user.email, &user.name, code, VERIFICATION_CODE_TTL_MINUTES)
            .await?;
        Ok(RegisterResponse {
            email: user.email.clone(),
            expires_in: VERIFICATION_CODE_TTL_MINUTES * 60,
        })
    }

    /// Creates an unverified account and emails its code. Registering again with an
    /// address that is still unverified replaces the name, password and code.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let name = require_text("name", &request.name, 100)?;
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;
        let password_hash = hash_password(&request.password)?;
        let (code, expires_at) = Self::fresh_code();
        let now = Utc::now();

        let user = match self.find_by_email(&email).await? {
            Some(existing) if existing.is_verified => {
                return Err(AppError::ValidationError(
                    "Email is already registered".to_string(),
                ));
            }
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.name = Set(name);
                model.password = Set(Some(password_hash));
                model.verification_code = Set(Some(code.clone()));
                model.verification_expires_at = Set(Some(expires_at));
                model.verification_attempts = Set(0);
                model.updated_at = Set(now);
                model.update(&self.pool).await?
            }
            None => {
                users::ActiveModel {
                    name: Set(name),
                    email: Set(email),
                    password: Set(Some(password_hash)),
                    role: Set(UserRole::User),
                    is_verified: Set(false),
                    verification_code: Set(Some(code.clone())),
                    verification_expires_at: Set(Some(expires_at)),
                    verification_attempts: Set(0),
                    is_contributor: Set(false),
                    avatar_url: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        log::info!("User {} registered, awaiting verification", user.id);
        self.send_code(&user, &code).await
    }

    pub async fn verify_email(&self, request: VerifyEmailRequest) -> AppResult<SignedIn> {
        let email = normalize_email(&request.email)?;
        let invalid = || AppError::ValidationError("Invalid verification code".to_string());

        let user = self.find_by_email(&email).await?.ok_or_else(invalid)?;
        if user.is_verified {
            return Err(AppError::ValidationError(
                "Email is already verified".to_string(),
            ));
        }
        if let Err(e) = check_code(&user, request.code.trim(), Utc::now()) {
            if user.verification_code.is_some() {
                self.record_wrong_code(user.id).await?;
            }
            return Err(e);
        }

        let mut model = user.into_active_model();
        model.is_verified = Set(true);
        model.verification_code = Set(None);
        model.verification_expires_at = Set(None);
        model.verification_attempts = Set(0);
        model.updated_at = Set(Utc::now());
        let user = model.update(&self.pool).await?;

        log::info!("User {} verified their email", user.id);
        self.issue(user)
    }

    /// Counted in the database so concurrent guesses all land.
    async fn record_wrong_code(&self, user_id: i64) -> AppResult<()> {
        users::Entity::update_many()
            .col_expr(
                users::Column::VerificationAttempts,
                Expr::col(users::Column::VerificationAttempts).add(1),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(&self.pool)
            .await?;
        log::warn!("Wrong verification code for user {user_id}");
        Ok(())
    }

    pub async fn resend_code(&self, request: ResendCodeRequest) -> AppResult<RegisterResponse> {
        let email = normalize_email(&request.email)?;
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("No pending registration for this email".to_string()))?;
        if user.is_verified {
            return Err(AppError::ValidationError(
                "Email is already verified".to_string(),
            ));
        }
        if let Some(expires_at) = user.verification_expires_at {
            let issued_at = expires_at - Duration::minutes(VERIFICATION_CODE_TTL_MINUTES);
            if Utc::now() - issued_at < Duration::seconds(RESEND_INTERVAL_SECONDS) {
                return Err(AppError::ValidationError(format!(
                    "Please wait {RESEND_INTERVAL_SECONDS} seconds before requesting a new code"
                )));
            }
        }

        let (code, expires_at) = Self::fresh_code();
        let mut model = user.into_active_model();
        model.verification_code = Set(Some(code.clone()));
        model.verification_expires_at = Set(Some(expires_at));
        model.verification_attempts = Set(0);
        model.updated_at = Set(Utc::now());
        let user = model.update(&self.pool).await?;

        self.send_code(&user, &code).await
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<SignedIn> {
        let email = normalize_email(&request.email)?;
        let bad_credentials = || AppError::AuthError("Invalid email or password".to_string());

        let user = self.find_by_email(&email).await?.ok_or_else(bad_credentials)?;
        // Google-only accounts have no password to check against
        let hash = user.password.as_deref().ok_or_else(bad_credentials)?;
        if !verify_password(&request.password, hash)? {
            return Err(bad_credentials());
        }
        if !user.is_verified {
            return Err(AppError::AuthError(
                "Please verify your email before signing in".to_string(),
            ));
        }

        log::info!("User {} signed in", user.id);
        self.issue(user)
    }

    pub async fn oauth_sign_in(
        &self,
        profile: GoogleProfile,
        intent: OAuthIntent,
    ) -> AppResult<OAuthOutcome> {
        if !profile.email_verified {
            return Err(AppError::AuthError(
                "Google account email is not verified".to_string(),
            ));
        }
        let email = normalize_email(&profile.email)?;
        let now = Utc::now();

        let user = match (self.find_by_email(&email).await?, intent) {
            (None, OAuthIntent::Login) => return Ok(OAuthOutcome::NotRegistered),
            (Some(existing), _) => {
                if existing.is_verified && existing.avatar_url.is_some() {
                    existing
                } else {
                    // Google vouches for the address, so a pending account becomes verified.
                    // Whoever chose the pending password never proved they own the address.
                    let was_verified = existing.is_verified;
                    let avatar = existing.avatar_url.clone().or(profile.picture.clone());
                    let mut model = existing.into_active_model();
                    if !was_verified {
                        model.password = Set(None);
                        model.verification_attempts = Set(0);
                    }
                    model.is_verified = Set(true);
                    model.verification_code = Set(None);
                    model.verification_expires_at = Set(None);
                    model.avatar_url = Set(avatar);
                    model.updated_at = Set(now);
                    model.update(&self.pool).await?
                }
            }
            (None, OAuthIntent::Register) => {
                let name = profile
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| email.split('@').next().unwrap_or("Jamaah").to_string());
                let created = users::ActiveModel {
                    name: Set(name),
                    email: Set(email),
                    password: Set(None),
                    role: Set(UserRole::User),
                    is_verified: Set(true),
                    verification_code: Set(None),
                    verification_expires_at: Set(None),
                    verification_attempts: Set(0),
                    is_contributor: Set(false),
                    avatar_url: Set(profile.picture),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                log::info!("User {} registered with Google", created.id);
                created
            }
        };

        Ok(OAuthOutcome::SignedIn(self.issue(user)?))
    }

    pub async fn current_user(&self, session: &SessionUser) -> AppResult<UserResponse> {
        users::Entity::find_by_id(session.id)
            .one(&self.pool)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::AuthError("Session user no longer exists".to_string()))
    }
}

fn check_code(user: &users::Model, code: &str, now: DateTime<Utc>) -> AppResult<()> {
    let (Some(expected), Some(expires_at)) =
        (user.verification_code.as_deref(), user.verification_expires_at)
    else {
        return Err(AppError::ValidationError(
            "Invalid verification code".to_string(),
        ));
    };
    if user.verification_attempts >= MAX_VERIFICATION_ATTEMPTS {
        return Err(AppError::ValidationError(
            "Too many wrong codes; request a new one".to_string(),
        ));
    }
    if now > expires_at {
        return Err(AppError::ValidationError(
            "Verification code has expired; request a new one".to_string(),
        ));
    }
    if expected != code {
        return Err(AppError::ValidationError(
            "Invalid verification code".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user(code: Option<&str>, expires_at: Option<DateTime<Utc>>) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: 1,
            name: "Ahmad".to_string(),
            email: "ahmad@example.com".to_string(),
            password: Some(hash_password("Password123").unwrap()),
            role: UserRole::User,
            is_verified: false,
            verification_code: code.map(str::to_string),
            verification_expires_at: expires_at,
            verification_attempts: 0,
            is_contributor: false,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(db: DatabaseConnection) -> AuthService {
        AuthService::new(
            db,
            JwtService::new("test-secret", 3600),
            Mailer::new(SmtpConfig::default(), "Masjid".to_string()),
        )
    }

    #[test]
    fn test_check_code() {
        let now = Utc::now();
        let u = user(Some("123456"), Some(now + Duration::minutes(5)));
        assert!(check_code(&u, "123456", now).is_ok());
        assert!(check_code(&u, "654321", now).is_err());
        assert!(check_code(&u, "123456", now + Duration::minutes(6)).is_err());
        assert!(check_code(&user(None, None), "123456", now).is_err());
    }

    #[test]
    fn test_check_code_locks_after_too_many_misses() {
        let now = Utc::now();
        let mut u = user(Some("123456"), Some(now + Duration::minutes(5)));
        u.verification_attempts = MAX_VERIFICATION_ATTEMPTS - 1;
        assert!(check_code(&u, "123456", now).is_ok());
        u.verification_attempts = MAX_VERIFICATION_ATTEMPTS;
        assert!(check_code(&u, "123456", now).is_err());
    }

    #[actix_web::test]
    async fn test_wrong_code_is_counted() {
        let pending = user(Some("123456"), Some(Utc::now() + Duration::minutes(5)));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let auth = service(db);
        let result = auth
            .verify_email(VerifyEmailRequest {
                email: "ahmad@example.com".to_string(),
                code: "000000".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let log = auth.pool.into_transaction_log();
        assert_eq!(log.len(), 2);
        let update = format!("{:?}", log[1]);
        assert!(update.contains("UPDATE"), "{update}");
        assert!(update.contains("verification_attempts"), "{update}");
    }

    #[actix_web::test]
    async fn test_google_sign_in_drops_pending_password() {
        let pending = user(Some("123456"), Some(Utc::now() + Duration::minutes(5)));
        let mut verified = pending.clone();
        verified.is_verified = true;
        verified.password = None;
        verified.verification_code = None;
        verified.verification_expires_at = None;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending]])
            .append_query_results([vec![verified]])
            .into_connection();
        let auth = service(db);
        let profile = GoogleProfile {
            email: "ahmad@example.com".to_string(),
            email_verified: true,
            name: Some("Ahmad".to_string()),
            picture: None,
        };
        let outcome = auth
            .oauth_sign_in(profile, OAuthIntent::Login)
            .await
            .unwrap();
        assert!(matches!(outcome, OAuthOutcome::SignedIn(_)));

        let log = auth.pool.into_transaction_log();
        assert_eq!(log.len(), 2);
        let update = format!("{:?}", log[1]);
        let set_clause = update.split("RETURNING").next().unwrap();
        assert!(set_clause.contains("UPDATE"), "{update}");
        assert!(set_clause.contains("password"), "{update}");
    }

    #[actix_web::test]
    async fn test_login_unverified_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(None, None)]])
            .into_connection();
        let result = service(db)
            .login(LoginRequest {
                email: "Ahmad@Example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[actix_web::test]
    async fn test_login_wrong_password() {
        let mut verified = user(None, None);
        verified.is_verified = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![verified]])
            .into_connection();
        let result = service(db)
            .login(LoginRequest {
                email: "ahmad@example.com".to_string(),
                password: "WrongPass1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
    }

    #[actix_web::test]
    async fn test_oauth_login_for_unknown_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let profile = GoogleProfile {
            email: "baru@example.com".to_string(),
            email_verified: true,
            name: Some("Baru".to_string()),
            picture: None,
        };
        let outcome = service(db)
            .oauth_sign_in(profile, OAuthIntent::Login)
            .await
            .unwrap();
        assert!(matches!(outcome, OAuthOutcome::NotRegistered));
    }

    #[actix_web::test]
    async fn test_verified_login_issues_session() {
        let mut verified = user(None, None);
        verified.is_verified = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![verified]])
            .into_connection();
        let auth = service(db);
        let signed_in = auth
            .login(LoginRequest {
                email: "ahmad@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await
            .unwrap();
        let session = JwtService::new("test-secret", 3600)
            .verify_session_token(&signed_in.token)
            .unwrap();
        assert_eq!(session.id, 1);
        assert_eq!(signed_in.response.expires_in, 3600);
    }
}
