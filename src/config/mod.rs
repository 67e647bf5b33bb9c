//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod database;
mod error_sink;
mod secret;

pub use database::DatabaseConfig;
#[cfg(feature = "secrets")]
pub use secret::fetch_database_secret;
pub use secret::{resolve_database_config, DatabaseSecret, SecretError};
pub use error_sink::{ErrorSinkConfig, ErrorSinkType, FilesystemSinkConfig, S3SinkConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "REPORT_ROUTER_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "REPORT_ROUTER";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "REPORT_ROUTER_LOG";
/// Deployment variable naming the database secret.
pub const DB_SECRET_NAME_ENV_VAR: &str = "DB_SECRET_NAME";
/// Deployment variable overriding the database port.
pub const DB_PORT_ENV_VAR: &str = "DB_PORT";

use serde::Deserialize;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Warehouse connection.
    pub database: DatabaseConfig,
    /// Where failed-query logs are written.
    pub error_sink: ErrorSinkConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix, `__` separated
    ///    (e.g. `REPORT_ROUTER__DATABASE__HOST`)
    /// 5. `DB_SECRET_NAME` and `DB_PORT`
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        config.apply_deployment_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `DB_SECRET_NAME` / `DB_PORT` as read through `lookup`.
    pub fn apply_deployment_env<F>(&mut self, lookup: F) -> Result<(), std::num::ParseIntError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(DB_SECRET_NAME_ENV_VAR).filter(|name| !name.is_empty()) {
            self.database.secret_name = Some(name);
        }
        if let Some(port) = lookup(DB_PORT_ENV_VAR) {
            self.database.port = port.trim().parse()?;
        }
        Ok(())
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self {
            error_sink: ErrorSinkConfig {
                sink_type: ErrorSinkType::Filesystem,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.error_sink.errors_prefix, "errors/");
    }

    #[test]
    fn test_config_for_test_uses_filesystem_sink() {
        let config = Config::for_test();
        assert_eq!(config.error_sink.sink_type, ErrorSinkType::Filesystem);
    }

    #[test]
    fn test_config_deserialize_yaml() {
        let yaml = r#"
            database:
              host: warehouse.internal
              port: 3307
              username: reporter
              password: secret
              database: inventory
              ssl_ca: /opt/certs/rds-combined-ca-bundle.pem
            error_sink:
              type: filesystem
              errors_prefix: ERRORS/search-rds/
              filesystem:
                base_path: /tmp/report-errors
        "#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.host, "warehouse.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.connect_timeout_secs, 10);
        assert!(config.database.ssl_ca.is_some());
        assert_eq!(config.error_sink.errors_prefix, "ERRORS/search-rds/");
    }

    #[test]
    fn test_deployment_env_sets_secret_and_port() {
        let mut config = Config::default();
        config
            .apply_deployment_env(|name| match name {
                "DB_SECRET_NAME" => Some("rds/search".to_string()),
                "DB_PORT" => Some("3307".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.database.secret_name.as_deref(), Some("rds/search"));
        assert_eq!(config.database.port, 3307);
    }

    #[test]
    fn test_deployment_env_absent_keeps_config() {
        let mut config = Config::default();
        config.apply_deployment_env(|_| None).unwrap();

        assert!(config.database.secret_name.is_none());
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn test_deployment_env_rejects_bad_port() {
        let mut config = Config::default();
        let result = config.apply_deployment_env(|name| {
            (name == "DB_PORT").then(|| "mysql".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_config_load_from_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "database:\n  host: from-file\n  database: inventory").unwrap();

        std::env::set_var("REPORT_ROUTER__DATABASE__PORT", "3310");
        let config = Config::load(file.path().to_str());
        std::env::remove_var("REPORT_ROUTER__DATABASE__PORT");

        let config = config.unwrap();
        assert_eq!(config.database.host, "from-file");
        assert_eq!(config.database.database, "inventory");
        assert_eq!(config.database.port, 3310);
    }
}
