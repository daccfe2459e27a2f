//! Application configuration loaded from environment variables.

use crate::services::IntrospectionOptions;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server and introspection settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PORT`, default 8081
    pub port: u16,
    /// `CORS_ALLOWED_ORIGINS`, comma separated; empty means permissive
    pub cors_allowed_origins: Vec<String>,
    /// `LOG_FORMAT` (`text` or `json`)
    pub log_format: LogFormat,
    /// Defaults applied to every request before per-request options
    pub introspection: IntrospectionOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8081,
            cors_allowed_origins: Vec::new(),
            log_format: LogFormat::Text,
            introspection: IntrospectionOptions::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base = defaults.introspection.clone();

        let introspection = IntrospectionOptions {
            sample_size: env_or("SCHEMA_SAMPLE_SIZE", base.sample_size),
            concurrency: env_or("SCHEMA_CONCURRENCY", base.concurrency),
            query_timeout: Duration::from_millis(env_or(
                "SCHEMA_QUERY_TIMEOUT_MS",
                base.query_timeout.as_millis() as u64,
            )),
            operation_timeout: Duration::from_millis(env_or(
                "SCHEMA_OPERATION_TIMEOUT_MS",
                base.operation_timeout.as_millis() as u64,
            )),
            max_depth: env_or("SCHEMA_MAX_DEPTH", base.max_depth),
            ..base
        };

        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            Some("text") | None => LogFormat::Text,
            Some(other) => {
                warn!("Unknown LOG_FORMAT {:?}, using text", other);
                LogFormat::Text
            }
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            port: env_or("PORT", defaults.port),
            cors_allowed_origins,
            log_format,
            introspection,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid value {:?} for {}", raw, key);
                default
            }
        },
        Err(_) => default,
    }
}
