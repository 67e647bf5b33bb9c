//! Report dispatch.
//!
//! [`ReportRouter::handle`] runs one event through the whole pipeline:
//! validate, normalize customers, compose, execute, wrap the result. Every
//! outcome the caller should see is an `Ok` envelope; only a failure to
//! record an execution failure escapes as [`RouterError`].


use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::customers::{self, CustomerSet};
use crate::envelope::ResponseEnvelope;
use crate::error_sink::ErrorSinkError;
use crate::event::{Event, ReportKind};
use crate::query::{self, reports};
use crate::reporter::ErrorReporter;
use crate::storage::{ConfigStore, Database, StorageError};
use crate::validation;

/// Errors that abort an invocation without an envelope.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("failed to record query failure: {0}")]
    ErrorSink(#[from] ErrorSinkError),
}

/// Result type for dispatch.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Outcome of customer resolution.
enum Customers {
    Resolved(CustomerSet),
    /// An alias expanded to no members.
    Empty,
}

/// Routes report events to the warehouse.
pub struct ReportRouter {
    database: Arc<dyn Database>,
    config_store: Arc<dyn ConfigStore>,
    reporter: ErrorReporter,
}

impl ReportRouter {
    pub fn new(
        database: Arc<dyn Database>,
        config_store: Arc<dyn ConfigStore>,
        reporter: ErrorReporter,
    ) -> Self {
        Self {
            database,
            config_store,
            reporter,
        }
    }

    /// Handle one event.
    ///
    /// Payloads that are not JSON objects carry no fields and are rejected
    /// for lacking `event_type`.
    pub async fn handle(&self, payload: &Value) -> Result<ResponseEnvelope> {
        let empty = Map::new();
        let event = Event::new(payload.as_object().unwrap_or(&empty));

        let report = match validation::validate_report(&event) {
            Ok(report) => report,
            Err(rejection) => return Ok(rejection),
        };
        if let Err(rejection) = validation::validate_params(&event, report) {
            return Ok(rejection);
        }

        info!(report = %report, "Dispatching report");

        let customers = match report.customer_param() {
            Some(param) => {
                let raw = event.get_str(param).unwrap_or_default();
                match self.resolve_customers(report, raw).await {
                    Ok(Customers::Resolved(set)) => Some(set),
                    Ok(Customers::Empty) => {
                        warn!(report = %report, raw = %raw, "Customer alias has no members");
                        return Ok(ResponseEnvelope::success(0, Vec::new()));
                    }
                    Err(e) => {
                        let lookup = reports::common_spec_customers()
                            .to_string(sea_query::MysqlQueryBuilder);
                        return self.fail(report, &lookup, &e.to_string()).await;
                    }
                }
            }
            None => None,
        };

        self.run(report, customers.as_ref()).await
    }

    /// Compose and execute `report`, reporting any failure.
    async fn run(
        &self,
        report: ReportKind,
        customers: Option<&CustomerSet>,
    ) -> Result<ResponseEnvelope> {
        let plan = match query::compose(report, customers) {
            Ok(plan) => plan,
            Err(e) => return self.fail(report, &report.to_string(), &e.to_string()).await,
        };
        debug!(report = %report, sql = %plan.sql(), "Composed report query");

        match self.database.execute(&plan.statement()).await {
            Ok(output) => {
                let count = output.row_count;
                info!(report = %report, count, "Report query succeeded");
                Ok(ResponseEnvelope::success(count, output.into_records()))
            }
            Err(e) => {
                let query = format!("{} + {}", plan.base_sql(), plan.where_sql());
                self.fail(report, &query, &e.to_string()).await
            }
        }
    }

    /// Expand aliases where the report allows it, then parse the list.
    async fn resolve_customers(
        &self,
        report: ReportKind,
        raw: &str,
    ) -> std::result::Result<Customers, StorageError> {
        let expanded = if report.expands_aliases() {
            customers::expand_alias(raw, self.config_store.as_ref()).await?
        } else {
            raw.to_string()
        };

        Ok(match customers::normalize(&expanded) {
            Ok(set) => {
                debug!(report = %report, customers = %set, "Resolved customers");
                Customers::Resolved(set)
            }
            Err(_) => Customers::Empty,
        })
    }

    /// Record a failed execution and build the `500` envelope.
    async fn fail(&self, report: ReportKind, query: &str, error: &str) -> Result<ResponseEnvelope> {
        error!(report = %report, error = %error, "Report query failed");
        self.reporter.report(query, error).await?;
        Ok(ResponseEnvelope::execution_failed(error))
    }
}
