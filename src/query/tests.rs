use sea_query::Value;

use super::*;
use crate::customers::normalize;

fn customers(raw: &str) -> CustomerSet {
    normalize(raw).unwrap()
}

#[test]
fn test_tag_search_single_customer() {
    let plan = compose(ReportKind::TagSearch, Some(&customers("ACME"))).unwrap();

    assert_eq!(
        plan.sql(),
        "SELECT * FROM `STOCK_MILLSHEET_TAG` WHERE `customer` IN ('ACME')"
    );
    assert_eq!(plan.where_sql(), "WHERE `customer` IN ('ACME')");
}

#[test]
fn test_tag_search_binds_customers() {
    let plan = compose(ReportKind::TagSearch, Some(&customers("A, B"))).unwrap();
    let (sql, values) = plan.build();

    assert_eq!(
        sql,
        "SELECT * FROM `STOCK_MILLSHEET_TAG` WHERE `customer` IN (?, ?)"
    );
    assert_eq!(values.0, vec![Value::from("A"), Value::from("B")]);
}

#[test]
fn test_customer_order_preserved() {
    let plan = compose(ReportKind::TagSearch, Some(&customers("C,A,B"))).unwrap();
    assert_eq!(plan.where_sql(), "WHERE `customer` IN ('C', 'A', 'B')");
}

#[test]
fn test_quotes_in_names_never_reach_placeholder_sql() {
    let plan = compose(ReportKind::DirectSaleSearch, Some(&customers("O'NEIL"))).unwrap();
    let (sql, values) = plan.build();

    assert!(!sql.contains("O'NEIL"));
    assert!(values.0.contains(&Value::from("O'NEIL")));
}

#[test]
fn test_direct_sale_projection() {
    let plan = compose(
        ReportKind::DirectSaleSearch,
        Some(&customers("AFT,AICHI FORGE")),
    )
    .unwrap();
    let sql = plan.sql();

    assert!(sql.contains("FROM `TTTC_DIRECT_SALE`"));
    assert!(sql.contains("`Customer Part no.`"));
    assert!(sql.contains("AS `ETA_Mon`"));
    assert!(sql.contains("DATE_FORMAT(`intake_date`, '%Y-%m-%d %H:%i:%S') AS `intake_date`"));
    assert!(sql.contains("AS `upd_timestamp`"));
    assert_eq!(
        plan.where_sql(),
        "WHERE `customer` IN ('AFT', 'AICHI FORGE')"
    );
}

#[test]
fn test_in_transit_joins_stock_position() {
    let plan = compose(ReportKind::InTransitSearch, Some(&customers("DENSO"))).unwrap();
    let sql = plan.sql();

    assert!(sql.contains("FROM `TTTC_IN_TRANSIT1`"));
    assert!(sql.contains("LEFT JOIN (SELECT"));
    assert!(sql.contains("FROM `KSSP_BAL_STOCK1`"));
    assert!(sql.contains("UPPER(`specification_`) AS `SPEC`"));
    assert!(sql.contains("GROUP_CONCAT(DISTINCT `maker`) AS `maker_list`"));
    assert!(sql.contains("AS `SPEC_KEYmaker`"));
    assert!(sql.contains("AS `its_custom`"));
    assert_eq!(plan.where_sql(), "WHERE `cust_shortname` IN ('DENSO')");
}

#[test]
fn test_forecast_joins_stock_position() {
    let plan = compose(ReportKind::ForecastSearch, Some(&customers("DENSO, AISIN"))).unwrap();
    let sql = plan.sql();

    assert!(sql.starts_with("SELECT * FROM (SELECT `forecast`.*"));
    assert!(sql.contains("FROM `CUSTOMER_FORECAST1`"));
    assert!(sql.contains("GROUP_CONCAT(DISTINCTROW `maker`) AS `maker_list`"));
    assert!(sql.contains("AS `t1`"));
    assert_eq!(
        plan.where_sql(),
        "WHERE `cust_shortname` IN ('DENSO', 'AISIN')"
    );
}

#[test]
fn test_latest_update_excludes_finished_goods_sources() {
    let plan = compose(ReportKind::LatestUpdate, None).unwrap();

    assert_eq!(
        plan.base_sql(),
        "SELECT `stamp_month`, `upd_timestamp`, `src_file_nm`, `src_table` FROM `UPD_TIMESTAMP`"
    );
    assert_eq!(
        plan.where_sql(),
        "WHERE `src_table` NOT IN ('fg', 'mc', 'shipout') ORDER BY `stamp_month` DESC, `upd_timestamp` DESC LIMIT 1"
    );
}

#[test]
fn test_latest_finished_goods_update_includes_only_those_sources() {
    let plan = compose(ReportKind::LatestFinishedGoodsUpdate, None).unwrap();

    assert_eq!(
        plan.where_sql(),
        "WHERE `src_table` IN ('fg', 'mc', 'shipout') ORDER BY `stamp_month` DESC, `upd_timestamp` DESC LIMIT 1"
    );
}

#[test]
fn test_cutting_center_customers_union() {
    let plan = compose(ReportKind::CuttingCenterCustomers, None).unwrap();
    let sql = plan.sql();

    assert!(sql.contains("FROM `CUTTINGCENTER_BAL_FG`"));
    assert!(sql.contains("FROM `CUTTINGCENTER_BAL_MC`"));
    assert!(sql.contains("UNION ALL"));
    assert!(sql.contains("'fg' AS `table_type`"));
    assert!(sql.contains("'mc' AS `table_type`"));
    assert!(sql.contains("GROUP BY `cutting_center`, `customer`, `table_type`"));
    assert_eq!(plan.where_sql(), "ORDER BY `customer` ASC");
}

#[test]
fn test_customer_reports_require_customers() {
    for report in [
        ReportKind::TagSearch,
        ReportKind::DirectSaleSearch,
        ReportKind::InTransitSearch,
        ReportKind::ForecastSearch,
    ] {
        assert_eq!(
            compose(report, None).unwrap_err(),
            ComposeError::CustomersRequired(report)
        );
    }
}

#[test]
fn test_fixed_reports_ignore_customers() {
    let set = customers("ACME");
    for report in [
        ReportKind::LatestUpdate,
        ReportKind::LatestFinishedGoodsUpdate,
        ReportKind::CuttingCenterCustomers,
    ] {
        let with = compose(report, Some(&set)).unwrap();
        let without = compose(report, None).unwrap();
        assert_eq!(with.sql(), without.sql());
        assert!(!with.sql().contains("ACME"));
    }
}

#[test]
fn test_every_plan_has_a_where_clause() {
    let set = customers("ACME");
    for report in ReportKind::ALL {
        let plan = compose(report, Some(&set)).unwrap();
        assert!(!plan.where_clause().is_empty(), "{report}");
        assert!(!plan.where_sql().is_empty(), "{report}");
        assert_eq!(plan.report(), report);
    }
}

#[test]
fn test_common_spec_lookup_statement() {
    assert_eq!(
        reports::common_spec_customers().to_string(MysqlQueryBuilder),
        "SELECT `customer` FROM `COMMON_SPEC_CONFIG` GROUP BY `customer`"
    );
}
