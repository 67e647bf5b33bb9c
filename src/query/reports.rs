//! Base statements for each report.
//!
//! Every function returns the fixed part of a report query: projection,
//! source tables, derived tables and joins. Filters, ordering and limits are
//! added by [`super::compose`] through the report's `WhereClause`.

use sea_query::{
    Alias, Asterisk, Condition, Expr, Func, FunctionCall, IntoColumnRef, JoinType, Query,
    SelectStatement, SimpleExpr, UnionType,
};

use super::schema::{
    CommonSpecConfig, CuttingCenterFg, CuttingCenterMc, Derived, DirectSale, Field, Forecast,
    InTransit, StockMillsheetTag, StockPosition, UpdTimestamp, DATE_TIME_FORMAT, TABLE_TYPE_FG,
    TABLE_TYPE_MC,
};

/// `DATE_FORMAT(col, '%Y-%m-%d %H:%i:%S')`
fn date_format<C: IntoColumnRef>(column: C) -> FunctionCall {
    Func::cust(Alias::new("DATE_FORMAT"))
        .arg(Expr::col(column))
        .arg(Expr::val(DATE_TIME_FORMAT))
}

/// `LEFT(col, 6)`: the `YYYYMM` prefix of an ETA.
fn month_of<C: IntoColumnRef>(column: C) -> FunctionCall {
    Func::cust(Alias::new("LEFT"))
        .arg(Expr::col(column))
        .arg(Expr::val(6))
}

/// `IFNULL(col, '')`
fn or_empty<C: IntoColumnRef>(column: C) -> FunctionCall {
    Func::if_null(Expr::col(column), Expr::val(""))
}

/// `GROUP_CONCAT(<modifier> maker)`; sea-query has no DISTINCT inside calls.
fn maker_list(modifier: &str) -> SimpleExpr {
    Expr::cust(format!("GROUP_CONCAT({modifier} `maker`)"))
}

/// `SELECT * FROM STOCK_MILLSHEET_TAG`
pub fn tag_search() -> SelectStatement {
    Query::select()
        .column(Asterisk)
        .from(StockMillsheetTag::Table)
        .to_owned()
}

/// Direct-sale lines with formatted dates and the ETA month.
pub fn direct_sale_search() -> SelectStatement {
    Query::select()
        .columns([
            DirectSale::Id,
            DirectSale::Specification,
            DirectSale::Diameter,
            DirectSale::Customer,
            DirectSale::Length,
            DirectSale::CustomerPartNo,
            DirectSale::Maker,
            DirectSale::Wh,
            DirectSale::InvoiceNo,
            DirectSale::SellingPrice,
            DirectSale::Inspection,
            DirectSale::PackageNo,
            DirectSale::ContentNo,
            DirectSale::Nweight,
            DirectSale::Total,
        ])
        .expr_as(
            Func::if_null(
                Func::cust(Alias::new("NULLIF"))
                    .arg(Expr::col(DirectSale::Eta))
                    .arg(Expr::val("")),
                Expr::val(""),
            ),
            DirectSale::Eta,
        )
        .expr_as(month_of(DirectSale::Eta), Field::EtaMon)
        .columns([DirectSale::Shipment, DirectSale::ScNo])
        .expr_as(date_format(DirectSale::IntakeDate), DirectSale::IntakeDate)
        .column(DirectSale::SrcFileNm)
        .expr_as(date_format(DirectSale::DeliveryDate), DirectSale::DeliveryDate)
        .expr_as(date_format(DirectSale::ActualDelivery), DirectSale::ActualDelivery)
        .expr_as(date_format(DirectSale::UpdTimestamp), DirectSale::UpdTimestamp)
        .from(DirectSale::Table)
        .to_owned()
}

/// In-transit lines with normalized join keys.
fn in_transit_lines() -> SelectStatement {
    Query::select()
        .expr_as(month_of(InTransit::Eta), Field::IntransitMonth)
        .column(InTransit::InvoiceNo)
        .expr_as(Func::upper(Expr::col(InTransit::Specification)), Field::Spec)
        .columns([
            InTransit::Inspection,
            InTransit::PackageNo,
            InTransit::ContentNo,
        ])
        .expr_as(or_empty(InTransit::Maker), InTransit::Maker)
        .columns([InTransit::Diameter, InTransit::Length, InTransit::Nweight])
        .expr_as(
            Func::cust(Alias::new("ROUND")).arg(Expr::col(InTransit::Nweight)),
            Field::NweightRound,
        )
        .column(InTransit::Total)
        .expr_as(or_empty(InTransit::CustomerPartNo), Field::CustPartNo)
        .columns([
            InTransit::Eta,
            InTransit::UpdTimestamp,
            InTransit::SrcFileNm,
        ])
        .from(InTransit::Table)
        .to_owned()
}

/// Makers per (customer, spec, diameter, part no) in the stock position.
fn stock_makers_by_part() -> SelectStatement {
    Query::select()
        .column(StockPosition::Customer)
        .expr_as(Func::upper(Expr::col(StockPosition::Specification)), Field::KSpec)
        .expr_as(Expr::col(StockPosition::Diameter), Field::KDia)
        .expr_as(or_empty(StockPosition::CustomerPartNo), Field::KCustPartNo)
        .expr_as(maker_list("DISTINCT"), Field::MakerList)
        .from(StockPosition::Table)
        .group_by_col(StockPosition::Customer)
        .group_by_col(Field::KSpec)
        .group_by_col(Field::KDia)
        .group_by_col(Field::KCustPartNo)
        .to_owned()
}

/// In-transit lines attributed to stock-position customers.
pub fn in_transit_search() -> SelectStatement {
    let attributed = Query::select()
        .column((Derived::Its, Asterisk))
        .column((Derived::Kssp, StockPosition::Customer))
        .expr_as(
            Expr::col((Derived::Kssp, StockPosition::Customer)),
            Field::CustShortname,
        )
        .column(Field::MakerList)
        .from_subquery(in_transit_lines(), Derived::Its)
        .join_subquery(
            JoinType::LeftJoin,
            stock_makers_by_part(),
            Derived::Kssp,
            Condition::all()
                .add(Expr::col(Field::Spec).equals(Field::KSpec))
                .add(Expr::col((Derived::Its, InTransit::Diameter)).equals(Field::KDia))
                .add(Expr::col(Field::CustPartNo).equals(Field::KCustPartNo)),
        )
        .to_owned();

    Query::select()
        .columns([
            Field::IntransitMonth,
            Field::Customer,
            Field::CustShortname,
        ])
        .column(InTransit::InvoiceNo)
        .column(Field::Spec)
        .column(InTransit::Diameter)
        .column(Field::CustPartNo)
        .column(InTransit::Maker)
        .column(Field::MakerList)
        .columns([
            InTransit::Length,
            InTransit::Inspection,
            InTransit::PackageNo,
            InTransit::ContentNo,
            InTransit::Nweight,
        ])
        .column(Field::NweightRound)
        .columns([InTransit::Total, InTransit::Eta])
        .expr_as(
            Func::cust(Alias::new("CONCAT"))
                .arg(Expr::col(Field::Spec))
                .arg(Expr::val("_"))
                .arg(Expr::col(InTransit::Diameter))
                .arg(Expr::val("_"))
                .arg(or_empty(Field::CustPartNo))
                .arg(or_empty(InTransit::Maker)),
            Field::SpecKeyMaker,
        )
        .expr_as(date_format(InTransit::UpdTimestamp), InTransit::UpdTimestamp)
        .column(InTransit::SrcFileNm)
        .from_subquery(attributed, Derived::ItsCustom)
        .to_owned()
}

/// Forecast lines with formatted upload time.
fn forecast_lines() -> SelectStatement {
    Query::select()
        .columns([
            Forecast::CustomerName,
            Forecast::AsOfMonth,
            Forecast::Specification,
            Forecast::Diameter,
            Forecast::CustomerPartNo,
            Forecast::Maker,
            Forecast::Length,
            Forecast::QuantityKg,
            Forecast::ForecastKg,
            Forecast::ForecastKgN1,
            Forecast::ForecastKgN2,
            Forecast::ForecastKgN3,
            Forecast::ForecastKgN4,
            Forecast::FileSetId,
            Forecast::SrcFileNm,
        ])
        .expr_as(date_format(Forecast::UpdTimestamp), Forecast::UpdTimestamp)
        .from(Forecast::Table)
        .to_owned()
}

/// Makers per (customer, spec, diameter) in the stock position.
fn stock_makers_by_spec() -> SelectStatement {
    Query::select()
        .column(StockPosition::Customer)
        .expr_as(Func::upper(Expr::col(StockPosition::Specification)), Field::Spec)
        .column(StockPosition::Diameter)
        .expr_as(maker_list("DISTINCTROW"), Field::MakerList)
        .from(StockPosition::Table)
        .group_by_col(StockPosition::Customer)
        .group_by_col(Field::Spec)
        .group_by_col(StockPosition::Diameter)
        .to_owned()
}

/// Forecasts joined to stock-position makers.
pub fn forecast_search() -> SelectStatement {
    let joined = Query::select()
        .column((Derived::Forecast, Asterisk))
        .expr_as(Expr::col(Forecast::CustomerName), Field::CustShortname)
        .column(Field::MakerList)
        .from_subquery(forecast_lines(), Derived::Forecast)
        .join_subquery(
            JoinType::LeftJoin,
            stock_makers_by_spec(),
            Derived::Kssp,
            Condition::all()
                .add(Expr::col(Forecast::CustomerName).equals(StockPosition::Customer))
                .add(
                    Expr::col((Derived::Forecast, Forecast::Specification))
                        .equals((Derived::Kssp, Field::Spec)),
                )
                .add(
                    Expr::col((Derived::Forecast, Forecast::Diameter))
                        .equals((Derived::Kssp, StockPosition::Diameter)),
                ),
        )
        .to_owned();

    Query::select()
        .column(Asterisk)
        .from_subquery(joined, Derived::T1)
        .to_owned()
}

/// `SELECT stamp_month, upd_timestamp, src_file_nm, src_table FROM UPD_TIMESTAMP`
pub fn upload_timestamps() -> SelectStatement {
    Query::select()
        .columns([
            UpdTimestamp::StampMonth,
            UpdTimestamp::UpdTimestamp,
            UpdTimestamp::SrcFileNm,
            UpdTimestamp::SrcTable,
        ])
        .from(UpdTimestamp::Table)
        .to_owned()
}

/// Distinct (cutting center, customer, origin) across fg and mc balances.
pub fn cutting_center_customers() -> SelectStatement {
    let mut both = Query::select()
        .expr_as(Expr::col(CuttingCenterFg::Center), Field::CuttingCenter)
        .column(CuttingCenterFg::Customer)
        .expr_as(Expr::val(TABLE_TYPE_FG), Field::TableType)
        .from(CuttingCenterFg::Table)
        .group_by_col(Field::CuttingCenter)
        .group_by_col(CuttingCenterFg::Customer)
        .to_owned();

    let machining = Query::select()
        .expr_as(Expr::col(CuttingCenterMc::Center), Field::CuttingCenter)
        .column(CuttingCenterMc::Customer)
        .expr_as(Expr::val(TABLE_TYPE_MC), Field::TableType)
        .from(CuttingCenterMc::Table)
        .group_by_col(Field::CuttingCenter)
        .group_by_col(CuttingCenterMc::Customer)
        .to_owned();

    both.union(UnionType::All, machining);

    Query::select()
        .column(Asterisk)
        .from_subquery(both, Derived::Union)
        .group_by_col(Field::CuttingCenter)
        .group_by_col(Field::Customer)
        .group_by_col(Field::TableType)
        .to_owned()
}

/// `SELECT customer FROM COMMON_SPEC_CONFIG GROUP BY customer`
pub fn common_spec_customers() -> SelectStatement {
    Query::select()
        .column(CommonSpecConfig::Customer)
        .from(CommonSpecConfig::Table)
        .group_by_col(CommonSpecConfig::Customer)
        .to_owned()
}
