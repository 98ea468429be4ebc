use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::directory::IdentifierPolicy;

pub const DEFAULT_STORE_PATH: &str = "job_applicants.json";

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let path = env::var("APPLICANT_STORE_PATH")
            .unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
        if path.trim().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }

        let identifier_policy = match env::var("APPLICANT_NAME_MATCH") {
            Ok(raw) => raw
                .parse::<IdentifierPolicy>()
                .map_err(|_| ConfigError::InvalidNameMatch { value: raw })?,
            Err(_) => IdentifierPolicy::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            store: StoreConfig {
                path: PathBuf::from(path.trim()),
                identifier_policy,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the directory lives and how identifiers resolve against it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub identifier_policy: IdentifierPolicy,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyStorePath,
    InvalidNameMatch { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyStorePath => write!(f, "APPLICANT_STORE_PATH must not be empty"),
            ConfigError::InvalidNameMatch { value } => write!(
                f,
                "APPLICANT_NAME_MATCH must be 'first' or 'reject', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APPLICANT_STORE_PATH");
        env::remove_var("APPLICANT_NAME_MATCH");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.store.path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.store.identifier_policy, IdentifierPolicy::FirstMatch);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_store_path_and_name_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("APPLICANT_STORE_PATH", " data/applicants.json ");
        env::set_var("APPLICANT_NAME_MATCH", "reject");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.store.path, PathBuf::from("data/applicants.json"));
        assert_eq!(
            config.store.identifier_policy,
            IdentifierPolicy::RejectAmbiguous
        );
    }

    #[test]
    fn rejects_unknown_name_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APPLICANT_NAME_MATCH", "closest");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidNameMatch { value }) if value == "closest"
        ));
    }

    #[test]
    fn rejects_blank_store_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APPLICANT_STORE_PATH", "   ");
        let result = AppConfig::load();
        reset_env();

        assert!(matches!(result, Err(ConfigError::EmptyStorePath)));
    }
}
