use std::str::FromStr;

use crate::error::{ErrorDetail, ErrorPolicy, ErrorStatus};

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Log line format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Settings for the scheduled dataset refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Whether the cron job is registered at all.
    pub enabled: bool,
    /// Seconds-first cron expression (`sec min hour day month weekday`).
    pub schedule: String,
    /// Program launched on each tick.
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: Option<String>,
    /// Fire one refresh immediately after startup.
    pub run_on_startup: bool,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults matching the existing deployment (SQLite file
/// under `data/`, Python scraper under `bin/`, refresh at minute 6 of every
/// hour). Override via environment variables or a `.env` file.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Allowed CORS origins. `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
    pub updater: UpdaterConfig,
    /// How failures are rendered to clients.
    pub error_policy: ErrorPolicy,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `HOST`                | `0.0.0.0`                |
    /// | `PORT`                | `3000`                   |
    /// | `DATABASE_URL`        | `sqlite://data/danDB.db` |
    /// | `DB_MAX_CONNECTIONS`  | `5`                      |
    /// | `CORS_ORIGINS`        | `*`                      |
    /// | `SCHEDULER_ENABLED`   | `true`                   |
    /// | `UPDATE_SCHEDULE`     | `0 6 * * * *`            |
    /// | `UPDATER_PROGRAM`     | `python3`                |
    /// | `UPDATER_ARGS`        | `bin/danShadow.py`       |
    /// | `UPDATER_WORKING_DIR` | (inherit)                |
    /// | `UPDATE_ON_STARTUP`   | `false`                  |
    /// | `ERROR_DETAIL`        | `verbose`                |
    /// | `ERROR_STATUS`        | `body`                   |
    /// | `LOG_FORMAT`          | `text`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let updater = UpdaterConfig {
            enabled: parse_bool("SCHEDULER_ENABLED", &var("SCHEDULER_ENABLED", "true"))?,
            schedule: var("UPDATE_SCHEDULE", "0 6 * * * *"),
            program: var("UPDATER_PROGRAM", "python3"),
            args: var("UPDATER_ARGS", "bin/danShadow.py")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            working_directory: lookup("UPDATER_WORKING_DIR").filter(|s| !s.trim().is_empty()),
            run_on_startup: parse_bool("UPDATE_ON_STARTUP", &var("UPDATE_ON_STARTUP", "false"))?,
        };

        let error_policy = ErrorPolicy {
            detail: parse("ERROR_DETAIL", &var("ERROR_DETAIL", "verbose"))?,
            status: parse("ERROR_STATUS", &var("ERROR_STATUS", "body"))?,
        };

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", &var("PORT", "3000"))?,
            database_url: var("DATABASE_URL", "sqlite://data/danDB.db"),
            db_max_connections: parse("DB_MAX_CONNECTIONS", &var("DB_MAX_CONNECTIONS", "5"))?,
            cors_origins,
            updater,
            error_policy,
            log_format: parse("LOG_FORMAT", &var("LOG_FORMAT", "text"))?,
        })
    }

    /// True when any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite://data/danDB.db".to_string(),
            db_max_connections: 5,
            cors_origins: vec!["*".to_string()],
            updater: UpdaterConfig {
                enabled: true,
                schedule: "0 6 * * * *".to_string(),
                program: "python3".to_string(),
                args: vec!["bin/danShadow.py".to_string()],
                working_directory: None,
                run_on_startup: false,
            },
            error_policy: ErrorPolicy {
                detail: ErrorDetail::Verbose,
                status: ErrorStatus::Body,
            },
            log_format: LogFormat::Text,
        }
    }
}
