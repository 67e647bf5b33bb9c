//! Error sink configuration.
//!
//! Failed queries are written as text objects under `errors_prefix`, either
//! to S3 (the deployed setup) or to a local directory.

use std::path::PathBuf;

use serde::Deserialize;

/// Error sink type discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSinkType {
    /// Amazon S3 (requires `s3` feature).
    #[default]
    S3,
    /// Local or mounted directory.
    Filesystem,
}

/// Configuration for failed-query logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ErrorSinkConfig {
    /// Sink type.
    #[serde(rename = "type")]
    pub sink_type: ErrorSinkType,
    /// Key prefix for error objects, including any trailing `/`.
    pub errors_prefix: String,
    /// S3 sink configuration.
    pub s3: S3SinkConfig,
    /// Filesystem sink configuration.
    pub filesystem: FilesystemSinkConfig,
}

impl Default for ErrorSinkConfig {
    fn default() -> Self {
        Self {
            sink_type: ErrorSinkType::default(),
            errors_prefix: "errors/".to_string(),
            s3: S3SinkConfig::default(),
            filesystem: FilesystemSinkConfig::default(),
        }
    }
}

/// S3 error sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct S3SinkConfig {
    /// Bucket receiving error logs.
    pub bucket: String,
    /// AWS region.
    pub region: Option<String>,
    /// Custom endpoint URL (for S3-compatible services like MinIO).
    pub endpoint: Option<String>,
}

impl Default for S3SinkConfig {
    fn default() -> Self {
        Self {
            bucket: "processing-notifications".to_string(),
            region: None,
            endpoint: None,
        }
    }
}

/// Filesystem error sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesystemSinkConfig {
    /// Directory that keys are resolved against.
    pub base_path: PathBuf,
}

impl Default for FilesystemSinkConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/var/report-router"),
        }
    }
}
