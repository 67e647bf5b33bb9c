//! Warehouse access.
//!
//! The router talks to the warehouse through two narrow traits:
//! - [`Database`] runs one composed SELECT and returns its rows
//! - [`ConfigStore`] answers the common-spec membership lookup
//!
//! [`MySqlDatabase`] (feature: mysql) is the production backend;
//! [`SqlConfigStore`] implements the lookup on top of any [`Database`].

use std::sync::Arc;

use async_trait::async_trait;
use sea_query::SelectStatement;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::query::reports;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "mysql")]
pub use mysql::MySqlDatabase;

/// Errors that can occur while running warehouse queries.
#[derive(Debug, Error)]
pub enum StorageError {
    #[cfg(feature = "mysql")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    QueryFailed(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// One result row keyed by column name, in column order.
pub type Record = Map<String, Value>;

/// Rows returned by a single statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Column names from the result descriptor.
    pub columns: Vec<String>,
    /// Row values, positionally aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
    /// Row count reported for the statement.
    pub row_count: u64,
}

impl QueryOutput {
    /// Zip every row against the column names.
    pub fn into_records(self) -> Vec<Record> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| columns.iter().cloned().zip(row).collect())
            .collect()
    }
}

/// Executes composed report statements.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run one SELECT and materialize all of its rows.
    async fn execute(&self, statement: &SelectStatement) -> Result<QueryOutput>;
}

/// Source of customer-group configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Distinct members of the `COMMON SPEC` group, in store order.
    async fn common_spec_customers(&self) -> Result<Vec<String>>;
}

/// [`ConfigStore`] reading `COMMON_SPEC_CONFIG` through a [`Database`].
pub struct SqlConfigStore {
    database: Arc<dyn Database>,
}

impl SqlConfigStore {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl ConfigStore for SqlConfigStore {
    async fn common_spec_customers(&self) -> Result<Vec<String>> {
        let output = self
            .database
            .execute(&reports::common_spec_customers())
            .await?;

        Ok(output
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(Value::String(customer)) => Some(customer),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
            .collect())
    }
}
