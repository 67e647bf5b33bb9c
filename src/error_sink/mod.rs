//! Destinations for failed-query logs.
//!
//! A failed report execution is written as a single text object keyed by
//! time of failure. Two backends are available:
//!
//! - `FilesystemErrorSink` - local or mounted directory
//! - `S3ErrorSink` (feature: s3) - Amazon S3 bucket

mod filesystem;
#[cfg(feature = "s3")]
mod s3;

pub use filesystem::FilesystemErrorSink;
#[cfg(feature = "s3")]
pub use s3::S3ErrorSink;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{ErrorSinkConfig, ErrorSinkType};

/// Errors that can occur while writing an error log.
#[derive(Debug, Error)]
pub enum ErrorSinkError {
    #[error("Failed to write error log: {0}")]
    WriteFailed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error sink {0} is not available in this build")]
    Unavailable(&'static str),
}

/// Result type for error sink operations.
pub type Result<T> = std::result::Result<T, ErrorSinkError>;

/// Write-only object store for error logs.
#[async_trait]
pub trait ErrorSink: Send + Sync {
    /// Store `body` under `key`, replacing any existing object.
    async fn put(&self, key: &str, body: &[u8]) -> Result<()>;

    /// Human-readable location of `key`, for logs.
    fn location(&self, key: &str) -> String;
}

/// Initialize the error sink described by `config`.
///
/// # Errors
///
/// Returns error if the configured sink requires an unavailable feature or
/// its target cannot be prepared.
pub async fn init_error_sink(config: &ErrorSinkConfig) -> Result<Arc<dyn ErrorSink>> {
    match config.sink_type {
        ErrorSinkType::Filesystem => {
            info!(
                path = %config.filesystem.base_path.display(),
                prefix = %config.errors_prefix,
                "ErrorSink: filesystem"
            );
            let sink = FilesystemErrorSink::new(&config.filesystem.base_path).await?;
            Ok(Arc::new(sink))
        }
        #[cfg(feature = "s3")]
        ErrorSinkType::S3 => {
            info!(
                bucket = %config.s3.bucket,
                prefix = %config.errors_prefix,
                region = ?config.s3.region,
                endpoint = ?config.s3.endpoint,
                "ErrorSink: s3"
            );
            let sink = match &config.s3.endpoint {
                Some(endpoint) => {
                    S3ErrorSink::with_endpoint(
                        &config.s3.bucket,
                        endpoint,
                        config.s3.region.as_deref(),
                    )
                    .await
                }
                None => S3ErrorSink::new(&config.s3.bucket, config.s3.region.as_deref()).await,
            };
            Ok(Arc::new(sink))
        }
        #[cfg(not(feature = "s3"))]
        ErrorSinkType::S3 => Err(ErrorSinkError::Unavailable("s3")),
    }
}
