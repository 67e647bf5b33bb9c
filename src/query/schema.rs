//! Warehouse schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! Column names follow the warehouse exactly, including the mixed-case and
//! space-containing ones loaded from spreadsheets.

use sea_query::Iden;

/// Millsheet tag view (report 1).
#[derive(Iden)]
pub enum StockMillsheetTag {
    #[iden = "STOCK_MILLSHEET_TAG"]
    Table,
    #[iden = "customer"]
    Customer,
}

/// Direct-sale lines (report 2).
#[derive(Iden)]
pub enum DirectSale {
    #[iden = "TTTC_DIRECT_SALE"]
    Table,
    #[iden = "ID"]
    Id,
    #[iden = "specification_"]
    Specification,
    #[iden = "diameter"]
    Diameter,
    #[iden = "customer"]
    Customer,
    #[iden = "length"]
    Length,
    #[iden = "Customer Part no."]
    CustomerPartNo,
    #[iden = "Maker"]
    Maker,
    #[iden = "WH"]
    Wh,
    #[iden = "invoice_no"]
    InvoiceNo,
    #[iden = "selling_price"]
    SellingPrice,
    #[iden = "inspection"]
    Inspection,
    #[iden = "package_no"]
    PackageNo,
    #[iden = "content_no"]
    ContentNo,
    #[iden = "nweight"]
    Nweight,
    #[iden = "Total"]
    Total,
    #[iden = "ETA"]
    Eta,
    #[iden = "shipment"]
    Shipment,
    #[iden = "sc_no"]
    ScNo,
    #[iden = "intake_date"]
    IntakeDate,
    #[iden = "src_file_nm"]
    SrcFileNm,
    #[iden = "delivery_date"]
    DeliveryDate,
    #[iden = "actual_delivery"]
    ActualDelivery,
    #[iden = "upd_timestamp"]
    UpdTimestamp,
}

/// In-transit shipment lines (report 3).
#[derive(Iden)]
pub enum InTransit {
    #[iden = "TTTC_IN_TRANSIT1"]
    Table,
    #[iden = "ETA"]
    Eta,
    #[iden = "invoice_no"]
    InvoiceNo,
    #[iden = "specification_"]
    Specification,
    #[iden = "inspection"]
    Inspection,
    #[iden = "package_no"]
    PackageNo,
    #[iden = "content_no"]
    ContentNo,
    #[iden = "maker"]
    Maker,
    #[iden = "diameter"]
    Diameter,
    #[iden = "length"]
    Length,
    #[iden = "nweight"]
    Nweight,
    #[iden = "Total"]
    Total,
    #[iden = "Customer Part no."]
    CustomerPartNo,
    #[iden = "upd_timestamp"]
    UpdTimestamp,
    #[iden = "src_file_nm"]
    SrcFileNm,
}

/// Stock-position reference table, source of maker lists.
#[derive(Iden)]
pub enum StockPosition {
    #[iden = "KSSP_BAL_STOCK1"]
    Table,
    #[iden = "customer"]
    Customer,
    #[iden = "specification_"]
    Specification,
    #[iden = "diameter"]
    Diameter,
    #[iden = "Customer Part no."]
    CustomerPartNo,
}

/// Customer forecasts (report 4).
#[derive(Iden)]
pub enum Forecast {
    #[iden = "CUSTOMER_FORECAST1"]
    Table,
    #[iden = "customer_name"]
    CustomerName,
    #[iden = "as_of_month"]
    AsOfMonth,
    #[iden = "specification"]
    Specification,
    #[iden = "diameter"]
    Diameter,
    #[iden = "customer_part_no"]
    CustomerPartNo,
    #[iden = "maker"]
    Maker,
    #[iden = "length"]
    Length,
    #[iden = "quantity_kg"]
    QuantityKg,
    #[iden = "forecast_kg"]
    ForecastKg,
    #[iden = "forecast_kg_N1"]
    ForecastKgN1,
    #[iden = "forecast_kg_N2"]
    ForecastKgN2,
    #[iden = "forecast_kg_N3"]
    ForecastKgN3,
    #[iden = "forecast_kg_N4"]
    ForecastKgN4,
    #[iden = "file_set_id"]
    FileSetId,
    #[iden = "src_file_nm"]
    SrcFileNm,
    #[iden = "upd_timestamp"]
    UpdTimestamp,
}

/// Members of the `COMMON SPEC` customer group.
#[derive(Iden)]
pub enum CommonSpecConfig {
    #[iden = "COMMON_SPEC_CONFIG"]
    Table,
    #[iden = "customer"]
    Customer,
}

/// Upload bookkeeping, one row per loaded source file (reports 5 and 6).
#[derive(Iden)]
pub enum UpdTimestamp {
    #[iden = "UPD_TIMESTAMP"]
    Table,
    #[iden = "stamp_month"]
    StampMonth,
    #[iden = "upd_timestamp"]
    UpdTimestamp,
    #[iden = "src_file_nm"]
    SrcFileNm,
    #[iden = "src_table"]
    SrcTable,
}

/// Cutting-center finished-goods balance (report 8).
#[derive(Iden)]
pub enum CuttingCenterFg {
    #[iden = "CUTTINGCENTER_BAL_FG"]
    Table,
    #[iden = "center"]
    Center,
    #[iden = "customer"]
    Customer,
}

/// Cutting-center machining balance (report 8).
#[derive(Iden)]
pub enum CuttingCenterMc {
    #[iden = "CUTTINGCENTER_BAL_MC"]
    Table,
    #[iden = "center"]
    Center,
    #[iden = "customer"]
    Customer,
}

/// Derived-table aliases.
#[derive(Iden)]
pub enum Derived {
    #[iden = "its"]
    Its,
    #[iden = "its_custom"]
    ItsCustom,
    #[iden = "kssp"]
    Kssp,
    #[iden = "forecast"]
    Forecast,
    #[iden = "t1"]
    T1,
    #[iden = "un"]
    Union,
}

/// Computed column aliases.
#[derive(Iden)]
pub enum Field {
    #[iden = "ETA_Mon"]
    EtaMon,
    #[iden = "intransit_month"]
    IntransitMonth,
    #[iden = "SPEC"]
    Spec,
    #[iden = "nweight_round"]
    NweightRound,
    #[iden = "cust_part_no"]
    CustPartNo,
    #[iden = "k_SPEC"]
    KSpec,
    #[iden = "k_DIA"]
    KDia,
    #[iden = "k_cust_part_no"]
    KCustPartNo,
    #[iden = "maker_list"]
    MakerList,
    #[iden = "customer"]
    Customer,
    #[iden = "cust_shortname"]
    CustShortname,
    #[iden = "SPEC_KEYmaker"]
    SpecKeyMaker,
    #[iden = "cutting_center"]
    CuttingCenter,
    #[iden = "table_type"]
    TableType,
}

/// `src_table` tags of the finished-goods, machining and shipout loads.
pub const FINISHED_GOODS_SOURCES: [&str; 3] = ["fg", "mc", "shipout"];

/// `table_type` tag for rows from [`CuttingCenterFg`].
pub const TABLE_TYPE_FG: &str = "fg";
/// `table_type` tag for rows from [`CuttingCenterMc`].
pub const TABLE_TYPE_MC: &str = "mc";

/// `DATE_FORMAT` pattern for timestamps returned to callers.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%i:%S";
