use std::str::FromStr;

use crate::services::auth_service::AuthSettings;
use crate::utils::AppError;

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Implicit TLS relay when true, plain connection otherwise (local catchers).
    pub tls: bool,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp: Option<SmtpSettings>,
    pub from: String,
    /// Signature printed under every confirmation.
    pub organization: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub auth: AuthSettings,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| AppError::ConfigError("DATABASE_URL must be set".to_string()))?;

        let jwt_secret = match get("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                log::warn!("⚠️  JWT_SECRET not set, using an insecure development secret");
                "dev-secret-change-me".to_string()
            }
        };

        let smtp = match get("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse(&get, "SMTP_PORT", 465)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                tls: parse(&get, "SMTP_TLS", true)?,
            }),
            None => None,
        };

        Ok(AppConfig {
            host: or("HOST", "0.0.0.0"),
            port: parse(&get, "PORT", 5555)?,
            database_url,
            upload_dir: or("UPLOAD_DIR", "uploads"),
            max_upload_bytes: parse(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            cors_origins: or("CORS_ORIGINS", DEFAULT_ORIGINS)
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            auth: AuthSettings {
                secret: jwt_secret,
                issuer: or("JWT_ISSUER", "backoffice-service"),
                ttl_hours: parse(&get, "JWT_TTL_HOURS", 24)?,
                bcrypt_cost: parse(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            mail: MailConfig {
                smtp,
                from: or("MAIL_FROM", "Back Office <noreply@localhost>"),
                organization: or("MAIL_ORGANIZATION", "The Back Office Team"),
            },
        })
    }
}

fn parse<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::ConfigError(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}
