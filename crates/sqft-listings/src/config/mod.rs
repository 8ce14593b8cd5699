use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the listings service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteConfig,
    pub admin: AdminConfig,
    /// Optional spreadsheet export used to seed the in-memory listing store.
    pub seed_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = SiteConfig::default();
        let site = SiteConfig {
            base_url: non_empty_var("SITE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            default_image: non_empty_var("SITE_DEFAULT_IMAGE").unwrap_or(defaults.default_image),
            agent_phone: non_empty_var("AGENT_PHONE").unwrap_or(defaults.agent_phone),
            ..defaults
        };

        let session_ttl_minutes = match non_empty_var("ADMIN_SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|minutes| (1..=MAX_SESSION_TTL_MINUTES).contains(minutes))
                .ok_or(ConfigError::InvalidSessionTtl)?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            site,
            admin: AdminConfig {
                password: non_empty_var("ADMIN_PASSWORD"),
                session_ttl_minutes,
            },
            seed_csv: non_empty_var("LISTINGS_SEED_CSV").map(PathBuf::from),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Public-facing site identity used by link previews, sitemaps, and share links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_url: String,
    pub brand: String,
    pub agent_name: String,
    pub agent_phone: String,
    pub default_title: String,
    pub default_description: String,
    pub default_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sqftbypd.com".to_string(),
            brand: "sqft by PD".to_string(),
            agent_name: "PD".to_string(),
            agent_phone: "918939929919".to_string(),
            default_title: "Sqft by PD | High-End Real Estate Agent in Chennai".to_string(),
            default_description: "Plan your next big move with Chennai's luxury property expert, Sqft by PD. Specializing in premium homes and investment properties in Chennai's most sought-after neighborhoods.".to_string(),
            default_image: "/og-default.jpeg".to_string(),
        }
    }
}

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 8 * 60;
/// Upper bound on admin session lifetime (30 days).
pub const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Admin gate settings. The password never appears in debug output.
#[derive(Clone)]
pub struct AdminConfig {
    pub password: Option<String>,
    pub session_ttl_minutes: i64,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionTtl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionTtl => {
                write!(
                    f,
                    "ADMIN_SESSION_TTL_MINUTES must be between 1 and {}",
                    MAX_SESSION_TTL_MINUTES
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSessionTtl => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
