use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::performance::DateWindow;

const DEFAULT_STORES: &str = "Downpatrick,Kilkeel,Newcastle,Ballynahinch";

/// Runtime stage. Only affects log output and readiness reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = var_or("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let stores = parse_stores(&var_or("MPI_STORES", DEFAULT_STORES))?;
        let window_raw = var_or("MPI_DEFAULT_WINDOW", "mtd");
        let default_window = window_raw
            .parse::<DateWindow>()
            .map_err(|_| ConfigError::InvalidWindow { value: window_raw })?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                stores,
                default_window,
            },
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_stores(raw: &str) -> Result<Vec<String>, ConfigError> {
    let mut stores: Vec<String> = Vec::new();
    for store in raw.split(',').map(str::trim).filter(|store| !store.is_empty()) {
        if !stores.iter().any(|known| known == store) {
            stores.push(store.to_string());
        }
    }

    if stores.is_empty() {
        return Err(ConfigError::NoStores);
    }
    Ok(stores)
}

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

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which stores the boards expect and the window used when a request names none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub stores: Vec<String>,
    pub default_window: DateWindow,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            stores: DEFAULT_STORES.split(',').map(str::to_string).collect(),
            default_window: DateWindow::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    NoStores,
    InvalidWindow { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::NoStores => write!(f, "MPI_STORES must name at least one store"),
            ConfigError::InvalidWindow { value } => write!(
                f,
                "MPI_DEFAULT_WINDOW '{value}' is not one of wtd, mtd, ytd, all, lastN"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::NoStores | ConfigError::InvalidWindow { .. } => {
                None
            }
        }
    }
}
