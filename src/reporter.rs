//! Failed-query audit logging.
//!
//! Each failure becomes one plain-text object whose key carries the time of
//! failure in the warehouse's local zone (UTC+7).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info};

use crate::envelope::{EXECUTION_FAILED_MESSAGE, STATUS_SERVER_ERROR};
use crate::error_sink::{ErrorSink, Result};

/// Hours added to UTC for error-log timestamps.
const KEY_OFFSET_HOURS: i64 = 7;
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const SEPARATOR: &str = "============";

/// Object key for a failure at `at`.
pub fn error_key(errors_prefix: &str, at: DateTime<Utc>) -> String {
    let local = at + Duration::hours(KEY_OFFSET_HOURS);
    format!(
        "{errors_prefix}error_{}.txt",
        local.format(KEY_TIMESTAMP_FORMAT)
    )
}

/// Plain-text log body for one failure.
pub fn error_log_body(query: &str, error: &str) -> String {
    format!(
        "\n'statusCode': {STATUS_SERVER_ERROR},\n'error': {error},\n'message': '{EXECUTION_FAILED_MESSAGE}'\n\
         {SEPARATOR}\nEXECUTE_QUERY:\n{query}\n{SEPARATOR}\n"
    )
}

/// Writes failed-query logs to an [`ErrorSink`].
#[derive(Clone)]
pub struct ErrorReporter {
    sink: Arc<dyn ErrorSink>,
    errors_prefix: String,
}

impl ErrorReporter {
    pub fn new(sink: Arc<dyn ErrorSink>, errors_prefix: impl Into<String>) -> Self {
        Self {
            sink,
            errors_prefix: errors_prefix.into(),
        }
    }

    /// Log a failure of `query` with `error`, returning the written key.
    pub async fn report(&self, query: &str, error: &str) -> Result<String> {
        self.report_at(query, error, Utc::now()).await
    }

    /// [`report`](Self::report) with an explicit failure time.
    pub async fn report_at(&self, query: &str, error: &str, at: DateTime<Utc>) -> Result<String> {
        let key = error_key(&self.errors_prefix, at);
        let body = error_log_body(query, error);

        if let Err(e) = self.sink.put(&key, body.as_bytes()).await {
            error!(key = %key, error = %e, "Failed to write error log");
            return Err(e);
        }

        info!(
            location = %self.sink.location(&key),
            "Query execution failed. Logged error report"
        );
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_sink::ErrorSinkError;
    use crate::test_utils::MockErrorSink;
    use chrono::TimeZone;

    #[test]
    fn test_error_key_uses_utc_plus_seven() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 10, 4, 5).unwrap();
        assert_eq!(error_key("errors/", at), "errors/error_20240315_170405.txt");
    }

    #[test]
    fn test_error_key_rolls_over_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(
            error_key("ERRORS/search-rds/", at),
            "ERRORS/search-rds/error_20250101_030000.txt"
        );
    }

    #[test]
    fn test_error_log_body_layout() {
        let body = error_log_body("SELECT 1 + ORDER BY x", "boom");

        assert!(body.contains("'statusCode': 500,"));
        assert!(body.contains("'error': boom,"));
        assert!(body.contains("'message': 'Query execution failed. Logged to S3.'"));
        assert!(body.contains("============\nEXECUTE_QUERY:\nSELECT 1 + ORDER BY x\n============"));
    }

    #[tokio::test]
    async fn test_report_writes_one_object() {
        let sink = Arc::new(MockErrorSink::new());
        let reporter = ErrorReporter::new(sink.clone(), "errors/");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let key = reporter
            .report_at("SELECT * FROM `T`", "Unknown column", at)
            .await
            .unwrap();

        assert_eq!(key, "errors/error_20240101_070000.txt");
        let puts = sink.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, key);
        assert!(puts[0].1.contains("Unknown column"));
        assert!(puts[0].1.contains("SELECT * FROM `T`"));
    }

    #[tokio::test]
    async fn test_report_returns_sink_failure() {
        let sink = Arc::new(MockErrorSink::failing("AccessDenied"));
        let reporter = ErrorReporter::new(sink, "errors/");

        let result = reporter.report("SELECT 1", "boom").await;
        assert!(matches!(result, Err(ErrorSinkError::WriteFailed(_))));
    }
}
