//! Warehouse connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// MySQL warehouse connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Schema holding the report tables.
    pub database: String,
    /// Seconds to wait for the connection before giving up.
    pub connect_timeout_secs: u64,
    /// CA bundle for verified TLS. Plain connections when unset.
    pub ssl_ca: Option<PathBuf>,
    /// Connection character set.
    pub charset: String,
    /// Secrets Manager secret holding host, credentials and schema.
    pub secret_name: Option<String>,
    /// Region of `secret_name`.
    pub secret_region: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            connect_timeout_secs: 10,
            ssl_ca: None,
            charset: "utf8mb4".to_string(),
            secret_name: None,
            secret_region: "ap-southeast-7".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.charset, "utf8mb4");
        assert!(config.ssl_ca.is_none());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_database_config_deserialize_minimal_yaml() {
        let yaml = r#"
            host: db.example
        "#;

        let config: DatabaseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.host, "db.example");
        assert_eq!(config.port, 3306);
        assert!(config.secret_name.is_none());
        assert_eq!(config.secret_region, "ap-southeast-7");
    }

    #[test]
    fn test_database_config_secret_yaml() {
        let yaml = r#"
            secret_name: rds/search
            secret_region: ap-southeast-1
        "#;

        let config: DatabaseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.secret_name.as_deref(), Some("rds/search"));
        assert_eq!(config.secret_region, "ap-southeast-1");
    }
}
