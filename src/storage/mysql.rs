//! MySQL warehouse backend.
//!
//! Statements are rendered with `?` placeholders by sea-query and executed
//! with their values bound through sea-query-binder. Connections run in
//! auto-commit mode, so a read needs no explicit commit.

use async_trait::async_trait;
use sea_query::{MysqlQueryBuilder, SelectStatement};
use sea_query_binder::SqlxBinder;
use serde_json::Value;
use sqlx::mysql::{
    MySqlColumn, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode,
};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, info};

use super::{Database, QueryOutput, Result};
use crate::config::DatabaseConfig;

/// Timestamp layout for DATETIME/TIMESTAMP columns not already formatted in SQL.
const DATETIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_LAYOUT: &str = "%Y-%m-%d";

/// MySQL implementation of [`Database`].
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    /// Wrap an existing pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open the warehouse connection described by `config`.
    ///
    /// The pool holds a single connection that is reused by every invocation.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset);

        if let Some(ca) = &config.ssl_ca {
            options = options.ssl_mode(MySqlSslMode::VerifyCa).ssl_ca(ca);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(config.connect_timeout())
            .connect_with(options)
            .await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to MySQL warehouse"
        );

        Ok(Self::new(pool))
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn execute(&self, statement: &SelectStatement) -> Result<QueryOutput> {
        let (sql, values) = statement.build_sqlx(MysqlQueryBuilder);
        debug!(sql = %sql, "Executing statement");

        let rows = sqlx::query_with(&sql, values).fetch_all(&self.pool).await?;

        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            decoded.push(decode_row(row)?);
        }

        Ok(QueryOutput {
            columns,
            row_count: decoded.len() as u64,
            rows: decoded,
        })
    }
}

fn decode_row(row: &MySqlRow) -> Result<Vec<Value>> {
    row.columns()
        .iter()
        .map(|column| decode_column(row, column))
        .collect()
}

/// Decode one column into a JSON scalar based on its MySQL type.
///
/// DECIMAL is kept as text to preserve precision. Binary strings (which is
/// how MySQL reports some GROUP_CONCAT results) are decoded as lossy UTF-8.
fn decode_column(row: &MySqlRow, column: &MySqlColumn) -> Result<Value> {
    let index = column.ordinal();
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let type_name = column.type_info().name();
    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get_unchecked::<bool, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "YEAR" => Value::from(row.try_get_unchecked::<u16, _>(index)?),
        name if name.ends_with("UNSIGNED") => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        "FLOAT" => Value::from(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get_unchecked::<f64, _>(index)?),
        "DATETIME" | "TIMESTAMP" => Value::String(
            row.try_get_unchecked::<chrono::NaiveDateTime, _>(index)?
                .format(DATETIME_LAYOUT)
                .to_string(),
        ),
        "DATE" => Value::String(
            row.try_get_unchecked::<chrono::NaiveDate, _>(index)?
                .format(DATE_LAYOUT)
                .to_string(),
        ),
        "TIME" => Value::String(
            row.try_get_unchecked::<chrono::NaiveTime, _>(index)?
                .to_string(),
        ),
        "JSON" => row.try_get_unchecked::<Value, _>(index)?,
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };

    Ok(value)
}
