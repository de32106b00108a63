//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;

use chrono::Duration;
use study_tracker_core::StudyCalendar;
use tracing::Level;

/// Longest login lifetime accepted from `AUTH_SESSION_DAYS`.
pub const MAX_AUTH_SESSION_DAYS: i64 = 3650;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `PracticeStore` implementation backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String, max_connections: u32 },
    /// Process-local and lost on restart. For development and tests.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub store: StoreBackend,
    pub log_level: Level,
    pub cache_ttl: Duration,
    pub calendar: StudyCalendar,
    pub cors_origin: String,
    pub auth_session_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            store: StoreBackend::Memory,
            log_level: Level::INFO,
            cache_ttl: Duration::seconds(study_tracker_core::freshness::DEFAULT_TTL_SECS),
            calendar: StudyCalendar::default(),
            cors_origin: "http://localhost:5173".to_string(),
            auth_session_days: 30,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. `from_env` uses the process
    /// environment.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Load Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        // --- Load Store Settings ---
        let backend = var("STORE_BACKEND").unwrap_or_else(|| "postgres".to_string());
        let store = match backend.to_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: var("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
                max_connections: parse_or("DATABASE_MAX_CONNECTIONS", &var, 5)?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORE_BACKEND".to_string(),
                    format!("'{}' is not one of postgres, memory", other),
                ))
            }
        };

        // --- Load Tracker Settings ---
        let ttl_secs: i64 = parse_or(
            "CACHE_TTL_SECS",
            &var,
            study_tracker_core::freshness::DEFAULT_TTL_SECS,
        )?;
        let cache_ttl = Duration::try_seconds(ttl_secs)
            .filter(|_| ttl_secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "CACHE_TTL_SECS".to_string(),
                    format!("{} is not a positive number of seconds", ttl_secs),
                )
            })?;

        let offset_minutes: i32 = parse_or(
            "STUDY_UTC_OFFSET_MINUTES",
            &var,
            study_tracker_core::calendar::DEFAULT_UTC_OFFSET_MINUTES,
        )?;
        let calendar = StudyCalendar::from_offset_minutes(offset_minutes).ok_or_else(|| {
            ConfigError::InvalidValue(
                "STUDY_UTC_OFFSET_MINUTES".to_string(),
                format!("{} is not a valid UTC offset", offset_minutes),
            )
        })?;

        let auth_session_days: i64 = parse_or("AUTH_SESSION_DAYS", &var, 30)?;
        if !(1..=MAX_AUTH_SESSION_DAYS).contains(&auth_session_days) {
            return Err(ConfigError::InvalidValue(
                "AUTH_SESSION_DAYS".to_string(),
                format!("must be between 1 and {}", MAX_AUTH_SESSION_DAYS),
            ));
        }

        Ok(Self {
            bind_address,
            store,
            log_level,
            cache_ttl,
            calendar,
            cors_origin,
            auth_session_days,
        })
    }
}

fn parse_or<T>(key: &str, var: &impl Fn(&str) -> Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn postgres_requires_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn defaults_apply_for_memory_backend() {
        let config = Config::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.cache_ttl, Duration::seconds(300));
        assert_eq!(config.calendar, StudyCalendar::default());
        assert_eq!(config.bind_address.port(), 3000);
    }

    #[test]
    fn reads_postgres_and_tracker_settings() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/prep"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("CACHE_TTL_SECS", "60"),
            ("STUDY_UTC_OFFSET_MINUTES", "0"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/prep".to_string(),
                max_connections: 12
            }
        );
        assert_eq!(config.cache_ttl, Duration::seconds(60));
        assert_eq!(config.calendar, StudyCalendar::from_offset_minutes(0).unwrap());
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("CACHE_TTL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "CACHE_TTL_SECS"));

        let err = Config::from_lookup(lookup(&[("STORE_BACKEND", "sqlite")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "STORE_BACKEND"));
    }

    #[test]
    fn auth_session_days_must_stay_in_range() {
        for days in ["0", "-3", "3651", "9223372036854775807"] {
            let err = Config::from_lookup(lookup(&[
                ("STORE_BACKEND", "memory"),
                ("AUTH_SESSION_DAYS", days),
            ]))
            .unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidValue(var, _) if var == "AUTH_SESSION_DAYS"),
                "{days}: {err}"
            );
        }

        let err = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("CACHE_TTL_SECS", "9223372036854775807"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(var, _) if var == "CACHE_TTL_SECS"));

        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("AUTH_SESSION_DAYS", "3650"),
        ]))
        .unwrap();
        assert_eq!(config.auth_session_days, MAX_AUTH_SESSION_DAYS);
    }
}
