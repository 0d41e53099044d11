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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub scoring: ScoringSettings,
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

        let data_file = env::var("APP_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("user_data.json"));
        let bills_dir = env::var("APP_BILLS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploaded_bills"));

        let bonus = match (
            env::var("APP_SCORE_BONUS_FIXED").ok(),
            env::var("APP_SCORE_BONUS_SEED").ok(),
        ) {
            (Some(raw), _) => {
                let value = raw
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|value| *value <= 5)
                    .ok_or(ConfigError::InvalidBonus)?;
                BonusMode::Fixed(value)
            }
            (None, Some(raw)) => BonusMode::Seeded(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            (None, None) => BonusMode::Random,
        };

        let tariff_per_unit = match env::var("APP_TARIFF_PER_UNIT") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or(ConfigError::InvalidTariff)?,
            Err(_) => DEFAULT_TARIFF_PER_UNIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig {
                data_file,
                bills_dir,
            },
            scoring: ScoringSettings {
                bonus,
                tariff_per_unit,
            },
        })
    }
}

/// PKR per kWh used for bill estimates when no tariff is configured.
pub const DEFAULT_TARIFF_PER_UNIT: f64 = 23.5;

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
}

/// Locations of the usage document and uploaded bill images.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    pub bills_dir: PathBuf,
}

/// How the top-band EcoScore bonus is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusMode {
    Random,
    Seeded(u64),
    Fixed(u8),
}

#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub bonus: BonusMode,
    pub tariff_per_unit: f64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBonus,
    InvalidSeed,
    InvalidTariff,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBonus => {
                write!(f, "APP_SCORE_BONUS_FIXED must be an integer between 0 and 5")
            }
            ConfigError::InvalidSeed => write!(f, "APP_SCORE_BONUS_SEED must be a valid u64"),
            ConfigError::InvalidTariff => {
                write!(f, "APP_TARIFF_PER_UNIT must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
