use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub prayer: PrayerConfig,
    #[serde(default)]
    pub quran: QuranConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public base URL without trailing slash, used for OAuth callbacks and the sitemap.
    pub base_url: String,
    pub upload_dir: String,
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl AppConfig {
    /// Cookies are marked `Secure` when the portal is served over TLS.
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn default_app_name() -> String {
    "Masjid Portal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerConfig {
    pub base_url: String,
    /// Calculation method id understood by the upstream API (20 = Kemenag RI).
    pub method: u8,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.aladhan.com/v1".to_string(),
            method: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuranConfig {
    pub base_url: String,
}

impl Default for QuranConfig {
    fn default() -> Self {
        Self {
            base_url: "https://equran.id/api/v2".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 3000u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    session: SessionConfig {
                        secret: get_env("SESSION_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        expires_in: get_env_parse("SESSION_EXPIRES_IN", 604_800i64),
                    },
                    app: AppConfig {
                        base_url: get_env("APP_BASE_URL")
                            .unwrap_or_else(|| "http://localhost:3000".to_string()),
                        upload_dir: get_env("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
                        name: get_env("APP_NAME").unwrap_or_else(default_app_name),
                    },
                    google: GoogleConfig::default(),
                    smtp: SmtpConfig::default(),
                    prayer: PrayerConfig::default(),
                    quran: QuranConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        config.app.base_url = config.app.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.session.expires_in = n;
        }
        if let Ok(v) = env::var("APP_BASE_URL") {
            self.app.base_url = v;
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.app.upload_dir = v;
        }
        if let Ok(v) = env::var("APP_NAME") {
            self.app.name = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = v;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT")
            && let Ok(p) = v.parse()
        {
            self.smtp.port = p;
        }
        if let Ok(v) = env::var("SMTP_USERNAME") {
            self.smtp.username = v;
        }
        if let Ok(v) = env::var("SMTP_PASSWORD") {
            self.smtp.password = v;
        }
        if let Ok(v) = env::var("SMTP_FROM") {
            self.smtp.from = v;
        }
        if let Ok(v) = env::var("PRAYER_API_BASE_URL") {
            self.prayer.base_url = v;
        }
        if let Ok(v) = env::var("PRAYER_METHOD")
            && let Ok(m) = v.parse()
        {
            self.prayer.method = m;
        }
        if let Ok(v) = env::var("QURAN_API_BASE_URL") {
            self.quran.base_url = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [database]
            url = "postgres://localhost/masjid"
            max_connections = 5

            [session]
            secret = "s3cret"
            expires_in = 3600

            [app]
            base_url = "https://masjid.example"
            upload_dir = "uploads"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.app.name, "Masjid Portal");
        assert_eq!(config.prayer.method, 20);
        assert_eq!(config.smtp.port, 587);
        assert!(config.google.client_id.is_empty());
        assert_eq!(config.quran.base_url, "https://equran.id/api/v2");
    }
}
