//! Report query composition.
//!
//! A report query is a fixed base statement plus a per-invocation
//! [`WhereClause`] (customer filter or fixed filter, ordering, limit). The
//! composed [`QueryPlan`] is built twice from the same statement:
//! - with `?` placeholders and bound values for execution
//! - with inlined, escaped literals for logs and error reports

pub mod reports;
pub mod schema;

#[cfg(test)]
mod tests;

use sea_query::{
    ColumnRef, Expr, IntoColumnRef, MysqlQueryBuilder, Order, SelectStatement, SimpleExpr, Values,
};
use thiserror::Error;

use crate::customers::CustomerSet;
use crate::event::ReportKind;
use schema::{Field, StockMillsheetTag, UpdTimestamp, FINISHED_GOODS_SOURCES};

/// Errors that can occur during composition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("report {0} requires a customer list")]
    CustomersRequired(ReportKind),
}

/// Result type for composition.
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Per-invocation refinement of a base statement.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    filter: Option<SimpleExpr>,
    order_by: Vec<(ColumnRef, Order)>,
    limit: Option<u64>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict rows to those matching `expr`.
    pub fn filter(mut self, expr: SimpleExpr) -> Self {
        self.filter = Some(expr);
        self
    }

    pub fn order_by<C: IntoColumnRef>(mut self, column: C, order: Order) -> Self {
        self.order_by.push((column.into_column_ref(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.order_by.is_empty() && self.limit.is_none()
    }

    fn apply_to(&self, statement: &mut SelectStatement) {
        if let Some(filter) = &self.filter {
            statement.and_where(filter.clone());
        }
        for (column, order) in &self.order_by {
            statement.order_by(column.clone(), order.clone());
        }
        if let Some(limit) = self.limit {
            statement.limit(limit);
        }
    }
}

/// A composed report query.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    report: ReportKind,
    base_query: SelectStatement,
    where_clause: WhereClause,
}

impl QueryPlan {
    pub fn report(&self) -> ReportKind {
        self.report
    }

    pub fn where_clause(&self) -> &WhereClause {
        &self.where_clause
    }

    /// Base statement with the where clause applied.
    pub fn statement(&self) -> SelectStatement {
        let mut statement = self.base_query.clone();
        self.where_clause.apply_to(&mut statement);
        statement
    }

    /// Placeholder SQL and bound values, as executed.
    pub fn build(&self) -> (String, Values) {
        self.statement().build(MysqlQueryBuilder)
    }

    /// Full SQL with literals inlined.
    pub fn sql(&self) -> String {
        self.statement().to_string(MysqlQueryBuilder)
    }

    /// Base SQL with literals inlined.
    pub fn base_sql(&self) -> String {
        self.base_query.to_string(MysqlQueryBuilder)
    }

    /// Where-clause SQL with literals inlined.
    ///
    /// Report bases keep any top-level grouping before their refinements, so
    /// the full statement always extends the base text.
    pub fn where_sql(&self) -> String {
        let full = self.sql();
        let base = self.base_sql();
        match full.strip_prefix(&base) {
            Some(rest) => rest.trim().to_string(),
            None => full,
        }
    }
}

/// `col IN ('A', 'B', ...)` over a customer list.
fn customer_filter<C: IntoColumnRef>(column: C, customers: &CustomerSet) -> SimpleExpr {
    Expr::col(column).is_in(customers.names().iter().cloned())
}

/// Compose the query for `report`.
///
/// Customer reports need `customers`; the others ignore it.
pub fn compose(report: ReportKind, customers: Option<&CustomerSet>) -> Result<QueryPlan> {
    let require_customers = || customers.ok_or(ComposeError::CustomersRequired(report));

    let (base_query, where_clause) = match report {
        ReportKind::TagSearch => (
            reports::tag_search(),
            WhereClause::new().filter(customer_filter(
                StockMillsheetTag::Customer,
                require_customers()?,
            )),
        ),
        ReportKind::DirectSaleSearch => (
            reports::direct_sale_search(),
            WhereClause::new().filter(customer_filter(
                schema::DirectSale::Customer,
                require_customers()?,
            )),
        ),
        ReportKind::InTransitSearch => (
            reports::in_transit_search(),
            WhereClause::new().filter(customer_filter(
                Field::CustShortname,
                require_customers()?,
            )),
        ),
        ReportKind::ForecastSearch => (
            reports::forecast_search(),
            WhereClause::new().filter(customer_filter(
                Field::CustShortname,
                require_customers()?,
            )),
        ),
        ReportKind::LatestUpdate => (
            reports::upload_timestamps(),
            latest_upload(Expr::col(UpdTimestamp::SrcTable).is_not_in(FINISHED_GOODS_SOURCES)),
        ),
        ReportKind::LatestFinishedGoodsUpdate => (
            reports::upload_timestamps(),
            latest_upload(Expr::col(UpdTimestamp::SrcTable).is_in(FINISHED_GOODS_SOURCES)),
        ),
        ReportKind::CuttingCenterCustomers => (
            reports::cutting_center_customers(),
            WhereClause::new().order_by(Field::Customer, Order::Asc),
        ),
    };

    debug_assert!(!where_clause.is_empty());

    Ok(QueryPlan {
        report,
        base_query,
        where_clause,
    })
}

/// Newest upload row matching `sources`.
fn latest_upload(sources: SimpleExpr) -> WhereClause {
    WhereClause::new()
        .filter(sources)
        .order_by(UpdTimestamp::StampMonth, Order::Desc)
        .order_by(UpdTimestamp::UpdTimestamp, Order::Desc)
        .limit(1)
}
