use crate::entities::{UserRole, user_entity};
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Signed-in user as seen by handlers, decoded from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, session_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_expires_in,
        }
    }

    pub fn generate_session_token(&self, user: &user_entity::Model) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.session_expires_in);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_session_token(&self, token: &str) -> AppResult<SessionUser> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)?;

        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid session subject".to_string()))?;

        Ok(SessionUser {
            id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        })
    }

    pub fn get_session_expires_in(&self) -> i64 {
        self.session_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> user_entity::Model {
        let now = Utc::now();
        user_entity::Model {
            id: 42,
            name: "Aisyah".to_string(),
            email: "aisyah@example.com".to_string(),
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

    #[test]
    fn test_session_token_roundtrip() {
        let jwt = JwtService::new("test-secret", 3600);
        let token = jwt.generate_session_token(&sample_user(UserRole::Admin)).unwrap();
        let session = jwt.verify_session_token(&token).unwrap();
        assert_eq!(session.id, 42);
        assert_eq!(session.email, "aisyah@example.com");
        assert!(session.is_admin());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);
        let token = issuer.generate_session_token(&sample_user(UserRole::User)).unwrap();
        assert!(verifier.verify_session_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::new("test-secret", -3600);
        let token = jwt.generate_session_token(&sample_user(UserRole::User)).unwrap();
        assert!(jwt.verify_session_token(&token).is_err());
    }
}
