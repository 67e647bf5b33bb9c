//! Bootstrap utilities for the report-router binary.
//!
//! Collaborators are created once per process and shared by every
//! invocation.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;
#[cfg(feature = "mysql")]
use crate::{config::Config, router::ReportRouter};

/// Initialize tracing with the REPORT_ROUTER_LOG environment variable.
///
/// Defaults to "info" level if REPORT_ROUTER_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Connect to the warehouse and error sink described by `config`.
#[cfg(feature = "mysql")]
pub async fn build_router(config: &Config) -> Result<ReportRouter, Box<dyn std::error::Error>> {
    use std::sync::Arc;

    use tracing::info;

    use crate::config::resolve_database_config;
    use crate::error_sink::init_error_sink;
    use crate::reporter::ErrorReporter;
    use crate::storage::{MySqlDatabase, SqlConfigStore};

    let database_config = resolve_database_config(&config.database).await?;
    let database = Arc::new(MySqlDatabase::connect(&database_config).await?);
    let config_store = Arc::new(SqlConfigStore::new(database.clone()));
    let sink = init_error_sink(&config.error_sink).await?;

    info!(
        errors_prefix = %config.error_sink.errors_prefix,
        "Report router ready"
    );

    Ok(ReportRouter::new(
        database,
        config_store,
        ErrorReporter::new(sink, config.error_sink.errors_prefix.clone()),
    ))
}
