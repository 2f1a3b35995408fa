use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub logto_m2m: LogtoM2MConfig,
    pub minio: MinIOConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
    /// Email whose profile claims the owner seat while it is still vacant
    pub owner_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Access-token verification against the Logto tenant
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Machine-to-machine client used to remove identities from Logto
#[derive(Debug, Clone)]
pub struct LogtoM2MConfig {
    pub client_id: String,
    pub client_secret: String,
    pub resource: String,
    pub scope: String,
    pub token_url: String,
    pub api_base_url: String,
}

/// Object store holding uploaded catalog images
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    pub endpoint: String,
    /// Endpoint used when building public URLs (defaults to `endpoint`)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// Prefix under which every uploaded image is stored and publicly readable
    pub image_prefix: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Absent key disables generation; recommendations then use the fallback
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: f32,
}

fn required(key: &str) -> Result<String, String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{} environment variable is required", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn text_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

/// Parse `raw` as `T`, or use `default` when the variable is unset
fn parse_setting<T>(key: &str, raw: Option<String>, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| format!("{} has an invalid value '{}': {}", key, value, e)),
    }
}

fn number_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    parse_setting(key, optional(key), default)
}

fn seconds_or(key: &str, default: u64) -> Result<Duration, String> {
    number_or(key, default).map(Duration::from_secs)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Management API lives at the tenant root, not under `/oidc`
fn management_base(issuer: &str) -> String {
    issuer
        .trim_end_matches('/')
        .trim_end_matches("/oidc")
        .to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => eprintln!("Warning: could not read .env: {}", e),
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
            logto_m2m: LogtoM2MConfig::from_env()?,
            minio: MinIOConfig::from_env()?,
            gemini: GeminiConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: text_or("HOST", "127.0.0.1"),
            port: number_or("PORT", 3000u16)?,
            cors_allowed_origins: split_origins(&text_or("CORS_ALLOWED_ORIGINS", "*")),
            max_request_body_size: number_or(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
            owner_email: optional("OWNER_EMAIL").map(|s| s.trim().to_lowercase()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            url: required("DATABASE_URL")?,
            max_connections: number_or("DB_MAX_CONNECTIONS", 10u32)?,
            min_connections: number_or("DB_MIN_CONNECTIONS", 1u32)?,
            acquire_timeout: seconds_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            idle_timeout: seconds_or("DB_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime: seconds_or("DB_MAX_LIFETIME_SECS", 1800)?,
        };

        if config.min_connections > config.max_connections {
            return Err("DB_MIN_CONNECTIONS cannot exceed DB_MAX_CONNECTIONS".to_string());
        }
        Ok(config)
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            issuer: required("LOGTO_ISSUER")?,
            audience: required("LOGTO_AUDIENCE")?,
            jwks_cache_ttl: seconds_or("JWKS_CACHE_TTL", 3600)?,
            jwt_leeway: seconds_or("JWT_LEEWAY", 60)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            username: optional("SWAGGER_USERNAME"),
            password: optional("SWAGGER_PASSWORD"),
            title: text_or("SWAGGER_TITLE", "Kompas Pacitan API"),
            version: text_or("SWAGGER_VERSION", env!("CARGO_PKG_VERSION")),
            description: text_or(
                "SWAGGER_DESCRIPTION",
                "Katalog desa, potensi, dan peluang investasi Kabupaten Pacitan",
            ),
        }
    }

    /// `username:password` when both are set; the docs are open otherwise
    pub fn credentials(&self) -> Option<String> {
        let user = self.username.as_deref()?;
        let pass = self.password.as_deref()?;
        Some(format!("{}:{}", user, pass))
    }
}

impl LogtoM2MConfig {
    pub fn from_env() -> Result<Self, String> {
        let issuer = required("LOGTO_ISSUER")?;

        Ok(Self {
            client_id: required("LOGTO_M2M_CLIENT_ID")?,
            client_secret: required("LOGTO_M2M_CLIENT_SECRET")?,
            resource: text_or("LOGTO_M2M_RESOURCE", "https://default.logto.app/api"),
            scope: text_or("LOGTO_M2M_SCOPE", "all"),
            token_url: format!("{}/token", issuer.trim_end_matches('/')),
            api_base_url: management_base(&issuer),
        })
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = text_or("MINIO_ENDPOINT", "http://localhost:9000")
            .trim_end_matches('/')
            .to_string();
        let public_endpoint = optional("MINIO_PUBLIC_ENDPOINT")
            .map(|e| e.trim_end_matches('/').to_string())
            .unwrap_or_else(|| endpoint.clone());

        let image_prefix = text_or("MINIO_IMAGE_PREFIX", "images")
            .trim_matches('/')
            .to_string();
        if image_prefix.is_empty() {
            return Err("MINIO_IMAGE_PREFIX must not be empty".to_string());
        }

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key: text_or("MINIO_ACCESS_KEY", "minioadmin"),
            secret_key: text_or("MINIO_SECRET_KEY", "minioadmin"),
            bucket: text_or("MINIO_BUCKET", "kompas-pacitan"),
            region: text_or("MINIO_REGION", "us-east-1"),
            image_prefix,
        })
    }
}

impl GeminiConfig {
    const DEFAULT_MODEL: &'static str = "gemini-1.5-flash";
    const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn from_env() -> Result<Self, String> {
        let temperature: f32 = number_or("GEMINI_TEMPERATURE", 0.4)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err("GEMINI_TEMPERATURE must be between 0.0 and 2.0".to_string());
        }

        Ok(Self {
            api_key: optional("GEMINI_API_KEY"),
            model: text_or("GEMINI_MODEL", Self::DEFAULT_MODEL),
            base_url: text_or("GEMINI_BASE_URL", Self::DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout: seconds_or("GEMINI_TIMEOUT_SECS", 30)?,
            temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_uses_default_when_unset() {
        assert_eq!(parse_setting("PORT", None, 3000u16).unwrap(), 3000);
        assert_eq!(
            parse_setting("PORT", Some(" 8080 ".to_string()), 3000u16).unwrap(),
            8080
        );
    }

    #[test]
    fn test_parse_setting_names_the_variable() {
        let err = parse_setting("DB_MAX_CONNECTIONS", Some("banyak".to_string()), 10u32)
            .unwrap_err();
        assert!(err.starts_with("DB_MAX_CONNECTIONS"));
        assert!(err.contains("banyak"));
    }

    #[test]
    fn test_split_origins_drops_blanks() {
        assert_eq!(
            split_origins("https://a.id, ,https://b.id,"),
            vec!["https://a.id".to_string(), "https://b.id".to_string()]
        );
    }

    #[test]
    fn test_management_base_strips_oidc() {
        assert_eq!(
            management_base("https://auth.example.id/oidc/"),
            "https://auth.example.id"
        );
        assert_eq!(
            management_base("https://auth.example.id"),
            "https://auth.example.id"
        );
    }

    #[test]
    fn test_swagger_credentials_need_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert!(swagger.credentials().is_none());
        swagger.password = Some("rahasia".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("admin:rahasia"));
    }
}
