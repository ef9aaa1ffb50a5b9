//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `TRISTORE_*` environment variables and
//! an optional configuration file. Optional fields fall back to defaults in
//! their accessors; the store connection strings are required.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::USER_NAME_MAX;
use crate::middleware::LogMode;
use crate::outbound::persistence::SqlIdStrategy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DATABASE_POOL_SIZE: u32 = 10;
const DEFAULT_MONGO_DATABASE: &str = "tristore";
const DEFAULT_MONGO_COLLECTION: &str = "users";

/// Invalid or missing configuration, reported at start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting `{key}` (env TRISTORE_{env})")]
    Missing { key: &'static str, env: String },
    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

impl SettingsError {
    fn missing(key: &'static str) -> Self {
        Self::Missing {
            key,
            env: key.to_ascii_uppercase(),
        }
    }

    fn invalid(key: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

/// Server, store and request handling configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRISTORE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// `debug` logs request dumps; `release` hides them.
    pub mode: Option<String>,
    /// Deadline applied to every store call of one request.
    pub request_timeout_ms: Option<u64>,
    /// Longest accepted user name, in characters.
    pub max_name_length: Option<usize>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    pub database_pool_size: Option<u32>,
    /// `returning` or `latest_row`.
    pub sql_id_strategy: Option<String>,
    /// Redis connection string.
    pub redis_url: Option<String>,
    /// MongoDB connection string.
    pub mongo_uri: Option<String>,
    pub mongo_database: Option<String>,
    pub mongo_collection: Option<String>,
}

fn required<'a>(value: Option<&'a String>, key: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SettingsError::missing(key))
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| SettingsError::invalid("bind_addr", err))
    }

    pub fn mode(&self) -> Result<LogMode, SettingsError> {
        self.mode
            .as_deref()
            .map_or(Ok(LogMode::default()), str::parse)
            .map_err(|err| SettingsError::invalid("mode", err))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }

    pub fn max_name_length(&self) -> usize {
        self.max_name_length.unwrap_or(USER_NAME_MAX)
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_ref(), "database_url")
    }

    pub fn database_pool_size(&self) -> u32 {
        self.database_pool_size
            .unwrap_or(DEFAULT_DATABASE_POOL_SIZE)
    }

    pub fn sql_id_strategy(&self) -> Result<SqlIdStrategy, SettingsError> {
        self.sql_id_strategy
            .as_deref()
            .map_or(Ok(SqlIdStrategy::default()), str::parse)
            .map_err(|err| SettingsError::invalid("sql_id_strategy", err))
    }

    pub fn redis_url(&self) -> Result<&str, SettingsError> {
        required(self.redis_url.as_ref(), "redis_url")
    }

    pub fn mongo_uri(&self) -> Result<&str, SettingsError> {
        required(self.mongo_uri.as_ref(), "mongo_uri")
    }

    pub fn mongo_database(&self) -> &str {
        self.mongo_database
            .as_deref()
            .unwrap_or(DEFAULT_MONGO_DATABASE)
    }

    pub fn mongo_collection(&self) -> &str {
        self.mongo_collection
            .as_deref()
            .unwrap_or(DEFAULT_MONGO_COLLECTION)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 11] = [
        "TRISTORE_BIND_ADDR",
        "TRISTORE_MODE",
        "TRISTORE_REQUEST_TIMEOUT_MS",
        "TRISTORE_MAX_NAME_LENGTH",
        "TRISTORE_DATABASE_URL",
        "TRISTORE_DATABASE_POOL_SIZE",
        "TRISTORE_SQL_ID_STRATEGY",
        "TRISTORE_REDIS_URL",
        "TRISTORE_MONGO_URI",
        "TRISTORE_MONGO_DATABASE",
        "TRISTORE_MONGO_COLLECTION",
    ];

    fn cleared_env() -> Vec<(&'static str, Option<String>)> {
        KEYS.iter().map(|key| (*key, None)).collect()
    }

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("tristore")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(DEFAULT_BIND_ADDR.parse().expect("valid default"))
        );
        assert_eq!(settings.mode(), Ok(LogMode::Debug));
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_name_length(), USER_NAME_MAX);
        assert_eq!(settings.database_pool_size(), 10);
        assert_eq!(settings.sql_id_strategy(), Ok(SqlIdStrategy::Returning));
        assert_eq!(settings.mongo_database(), "tristore");
        assert_eq!(settings.mongo_collection(), "users");
    }

    #[rstest]
    fn missing_connection_strings_are_reported() {
        let _guard = lock_env(cleared_env());

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.database_url(),
            Err(SettingsError::Missing { key: "database_url", .. })
        ));
        let err = settings.redis_url().expect_err("redis url missing");
        assert!(err.to_string().contains("TRISTORE_REDIS_URL"));
        assert!(settings.mongo_uri().is_err());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut env = cleared_env();
        env.extend([
            ("TRISTORE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("TRISTORE_MODE", Some("release".to_owned())),
            ("TRISTORE_REQUEST_TIMEOUT_MS", Some("250".to_owned())),
            ("TRISTORE_DATABASE_URL", Some("postgres://db/app".to_owned())),
            ("TRISTORE_SQL_ID_STRATEGY", Some("latest_row".to_owned())),
            ("TRISTORE_REDIS_URL", Some("redis://cache:6379".to_owned())),
            ("TRISTORE_MONGO_URI", Some("mongodb://docs:27017".to_owned())),
            ("TRISTORE_MONGO_DATABASE", Some("people".to_owned())),
        ]);
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("valid addr"))
        );
        assert_eq!(settings.mode(), Ok(LogMode::Release));
        assert_eq!(settings.request_timeout(), Duration::from_millis(250));
        assert_eq!(settings.database_url(), Ok("postgres://db/app"));
        assert_eq!(settings.sql_id_strategy(), Ok(SqlIdStrategy::LatestRow));
        assert_eq!(settings.redis_url(), Ok("redis://cache:6379"));
        assert_eq!(settings.mongo_uri(), Ok("mongodb://docs:27017"));
        assert_eq!(settings.mongo_database(), "people");
    }

    #[rstest]
    #[case("TRISTORE_MODE", "loud", "mode")]
    #[case("TRISTORE_SQL_ID_STRATEGY", "newest", "sql_id_strategy")]
    #[case("TRISTORE_BIND_ADDR", "not-an-addr", "bind_addr")]
    fn invalid_values_are_rejected(
        #[case] env_key: &'static str,
        #[case] value: &str,
        #[case] setting: &str,
    ) {
        let mut env = cleared_env();
        env.push((env_key, Some(value.to_owned())));
        let _guard = lock_env(env);

        let settings = load_from_empty_args();
        let err = match setting {
            "mode" => settings.mode().map(|_| ()),
            "sql_id_strategy" => settings.sql_id_strategy().map(|_| ()),
            _ => settings.bind_addr().map(|_| ()),
        }
        .expect_err("invalid value");
        assert!(matches!(err, SettingsError::Invalid { key, .. } if key == setting));
    }
}
