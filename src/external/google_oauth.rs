use crate::config::GoogleConfig;
use crate::error::{AppError, AppResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Which flow started the redirect. Carried through the provider in `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthIntent {
    Login,
    Register,
}

impl OAuthIntent {
    /// Missing intent means login; anything else unknown is a 400.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") | Some("login") => Ok(OAuthIntent::Login),
            Some("register") => Ok(OAuthIntent::Register),
            Some(other) => Err(AppError::ValidationError(format!(
                "Unknown intent: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    pub intent: OAuthIntent,
    pub nonce: String,
}

impl OAuthState {
    pub fn encode(&self) -> AppResult<String> {
        let raw = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    pub fn decode(state: &str) -> AppResult<Self> {
        let raw = URL_SAFE_NO_PAD
            .decode(state.trim())
            .map_err(|_| AppError::ValidationError("Invalid OAuth state".to_string()))?;
        serde_json::from_slice(&raw)
            .map_err(|_| AppError::ValidationError("Invalid OAuth state".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuthService {
    client: Client,
    config: GoogleConfig,
    redirect_uri: String,
}

impl GoogleOAuthService {
    pub fn new(config: GoogleConfig, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            config,
            redirect_uri: format!(
                "{}/api/auth/google/callback",
                base_url.trim_end_matches('/')
            ),
        }
    }

    fn client_id(&self) -> AppResult<&str> {
        if self.config.client_id.trim().is_empty() {
            return Err(AppError::ConfigError(
                "GOOGLE_CLIENT_ID is not configured".to_string(),
            ));
        }
        Ok(&self.config.client_id)
    }

    pub fn authorization_url(&self, state: &OAuthState) -> AppResult<String> {
        let client_id = self.client_id()?;
        let url = Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", client_id),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("access_type", "online"),
                ("prompt", "select_account"),
                ("state", state.encode()?.as_str()),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build OAuth URL: {e}")))?;
        Ok(url.to_string())
    }

    /// Code -> access token -> profile.
    pub async fn fetch_profile(&self, code: &str) -> AppResult<GoogleProfile> {
        let client_id = self.client_id()?;
        if self.config.client_secret.trim().is_empty() {
            return Err(AppError::ConfigError(
                "GOOGLE_CLIENT_SECRET is not configured".to_string(),
            ));
        }

        let params = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.client.post(TOKEN_ENDPOINT).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Google token exchange failed: HTTP {status}: {error_text}"
            )));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Google userinfo failed: HTTP {}",
                response.status().as_u16()
            )));
        }
        let profile: GoogleProfile = response.json().await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(client_id: &str) -> GoogleOAuthService {
        GoogleOAuthService::new(
            GoogleConfig {
                client_id: client_id.to_string(),
                client_secret: "secret".to_string(),
            },
            "https://masjid.example/",
        )
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!(OAuthIntent::parse(None).unwrap(), OAuthIntent::Login);
        assert_eq!(
            OAuthIntent::parse(Some("register")).unwrap(),
            OAuthIntent::Register
        );
        assert!(OAuthIntent::parse(Some("admin")).is_err());
    }

    #[test]
    fn test_state_roundtrip() {
        let state = OAuthState {
            intent: OAuthIntent::Register,
            nonce: "abc123".to_string(),
        };
        let encoded = state.encode().unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(OAuthState::decode(&encoded).unwrap(), state);
        assert!(OAuthState::decode("not base64 !!").is_err());
    }

    #[test]
    fn test_authorization_url_embeds_intent() {
        let state = OAuthState {
            intent: OAuthIntent::Register,
            nonce: "n".to_string(),
        };
        let url = Url::parse(&service("client-1").authorization_url(&state).unwrap()).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "client-1");
        assert_eq!(
            pairs["redirect_uri"],
            "https://masjid.example/api/auth/google/callback"
        );
        assert_eq!(OAuthState::decode(&pairs["state"]).unwrap(), state);
    }

    #[test]
    fn test_missing_client_id_is_config_error() {
        let state = OAuthState {
            intent: OAuthIntent::Login,
            nonce: "n".to_string(),
        };
        assert!(matches!(
            service("").authorization_url(&state),
            Err(AppError::ConfigError(_))
        ));
    }
}
