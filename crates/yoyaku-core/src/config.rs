use std::time::Duration;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_HORIZON_DAYS,
    DEFAULT_PERSISTENCE_TIMEOUT_MS, DEFAULT_REFRESH_INTERVAL_SECONDS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub booking: BookingConfig,
    pub cache: CacheConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// How many days of slots an availability query covers by default.
    pub horizon_days: u32,
    /// Interval of the optional presentation-layer availability refresh.
    pub refresh_interval_seconds: u64,
}

impl BookingConfig {
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub capacity: usize,
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Upper bound for a single persistence call, in milliseconds.
    pub timeout_ms: u64,
}

impl PersistenceConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("booking.horizon_days", u64::from(DEFAULT_HORIZON_DAYS))?
            .set_default(
                "booking.refresh_interval_seconds",
                DEFAULT_REFRESH_INTERVAL_SECONDS,
            )?
            .set_default("cache.ttl_seconds", DEFAULT_CACHE_TTL_SECONDS)?
            .set_default("cache.capacity", DEFAULT_CACHE_CAPACITY as u64)?
            .set_default("persistence.timeout_ms", DEFAULT_PERSISTENCE_TIMEOUT_MS)?
            .set_default("logging.level", "debug")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
