//! Warehouse credentials stored in AWS Secrets Manager.
//!
//! The secret is a JSON object with `host`, `username`, `password` and
//! `dbname`. Its values replace the matching [`DatabaseConfig`] fields; port,
//! TLS and timeouts stay as configured.

use serde::Deserialize;
use thiserror::Error;

use super::DatabaseConfig;

/// Errors that can occur while resolving database credentials.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to fetch secret {name}: {message}")]
    Fetch { name: String, message: String },

    #[error("Secret {0} has no string value")]
    Empty(String),

    #[error("Invalid database secret: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Secrets Manager support is not available in this build")]
    Unavailable,
}

/// Result type for secret resolution.
pub type Result<T> = std::result::Result<T, SecretError>;

/// Connection fields carried by the database secret.
#[derive(Clone, Deserialize)]
pub struct DatabaseSecret {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
}

impl DatabaseSecret {
    /// Parse the secret's JSON string.
    pub fn parse(secret: &str) -> Result<Self> {
        Ok(serde_json::from_str(secret)?)
    }

    /// Overlay the secret onto `config`.
    pub fn apply_to(self, config: &mut DatabaseConfig) {
        config.host = self.host;
        config.username = self.username;
        config.password = self.password;
        config.database = self.dbname;
    }
}

/// Fetch and parse the secret `name` from `region`.
#[cfg(feature = "secrets")]
pub async fn fetch_database_secret(name: &str, region: &str) -> Result<DatabaseSecret> {
    use aws_sdk_secretsmanager::error::DisplayErrorContext;

    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&config);

    let response = client
        .get_secret_value()
        .secret_id(name)
        .send()
        .await
        .map_err(|e| SecretError::Fetch {
            name: name.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

    let secret = response
        .secret_string()
        .ok_or_else(|| SecretError::Empty(name.to_string()))?;
    DatabaseSecret::parse(secret)
}

/// Effective connection settings for `config`.
///
/// Without `secret_name` the configuration is used as is.
pub async fn resolve_database_config(config: &DatabaseConfig) -> Result<DatabaseConfig> {
    let Some(name) = config.secret_name.as_deref() else {
        return Ok(config.clone());
    };

    #[cfg(feature = "secrets")]
    {
        tracing::info!(
            secret = %name,
            region = %config.secret_region,
            "Loading database credentials from Secrets Manager"
        );
        let mut resolved = config.clone();
        fetch_database_secret(name, &config.secret_region)
            .await?
            .apply_to(&mut resolved);
        Ok(resolved)
    }

    #[cfg(not(feature = "secrets"))]
    {
        tracing::error!(secret = %name, "Secrets Manager support is not compiled in");
        Err(SecretError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SECRET: &str = r#"{
        "username": "reporter",
        "password": "s3cr3t",
        "engine": "mysql",
        "host": "warehouse.cluster.ap-southeast-7.rds.amazonaws.com",
        "port": 3306,
        "dbname": "inventory"
    }"#;

    #[test]
    fn test_parse_rds_secret() {
        let secret = DatabaseSecret::parse(SECRET).unwrap();
        assert_eq!(secret.host, "warehouse.cluster.ap-southeast-7.rds.amazonaws.com");
        assert_eq!(secret.username, "reporter");
        assert_eq!(secret.password, "s3cr3t");
        assert_eq!(secret.dbname, "inventory");
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        let result = DatabaseSecret::parse(r#"{"host": "h", "username": "u", "password": "p"}"#);
        assert!(matches!(result, Err(SecretError::Parse(_))));
    }

    #[test]
    fn test_apply_to_keeps_connection_settings() {
        let mut config = DatabaseConfig {
            port: 3307,
            ssl_ca: Some(PathBuf::from("/opt/certs/rds-combined-ca-bundle.pem")),
            secret_name: Some("rds/search".to_string()),
            ..Default::default()
        };

        DatabaseSecret::parse(SECRET).unwrap().apply_to(&mut config);

        assert_eq!(config.host, "warehouse.cluster.ap-southeast-7.rds.amazonaws.com");
        assert_eq!(config.username, "reporter");
        assert_eq!(config.password, "s3cr3t");
        assert_eq!(config.database, "inventory");
        assert_eq!(config.port, 3307);
        assert!(config.ssl_ca.is_some());
        assert_eq!(config.charset, "utf8mb4");
    }

    #[tokio::test]
    async fn test_resolve_without_secret_is_unchanged() {
        let config = DatabaseConfig {
            host: "db.example".to_string(),
            username: "reporter".to_string(),
            ..Default::default()
        };

        let resolved = resolve_database_config(&config).await.unwrap();
        assert_eq!(resolved.host, "db.example");
        assert_eq!(resolved.username, "reporter");
    }

    #[cfg(not(feature = "secrets"))]
    #[tokio::test]
    async fn test_resolve_with_secret_needs_feature() {
        let config = DatabaseConfig {
            secret_name: Some("rds/search".to_string()),
            ..Default::default()
        };

        let result = resolve_database_config(&config).await;
        assert!(matches!(result, Err(SecretError::Unavailable)));
    }
}
