//! Inbound report events.
//!
//! An event is a JSON object carrying an `event_type` discriminator plus the
//! parameters that report needs. The discriminator maps onto the closed set of
//! [`ReportKind`] variants; anything else is rejected before composition.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

/// Field holding the report discriminator.
pub const EVENT_TYPE_FIELD: &str = "event_type";
/// Customer list parameter (report types 1, 2, 4).
pub const PARAM_CUSTOMER: &str = "CUSTOMER";
/// Customer short-name list parameter (report type 3).
pub const PARAM_CUSTOMER_SHORTNAME: &str = "CUSTOMER_SHORTNAME";

/// Canned report selected by an event's `event_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// `1`: millsheet tags for the given customers.
    TagSearch,
    /// `2`: direct-sale lines for the given customers.
    DirectSaleSearch,
    /// `3`: in-transit lines enriched with stock-position makers.
    InTransitSearch,
    /// `4`: customer forecasts enriched with stock-position makers.
    ForecastSearch,
    /// `5`: latest upload timestamp outside finished-goods/machining/shipout.
    LatestUpdate,
    /// `6`: latest upload timestamp for finished-goods/machining/shipout.
    LatestFinishedGoodsUpdate,
    /// `8`: distinct cutting-center/customer pairs across fg and mc balances.
    CuttingCenterCustomers,
}

impl ReportKind {
    /// Every report, in wire-code order.
    pub const ALL: [ReportKind; 7] = [
        ReportKind::TagSearch,
        ReportKind::DirectSaleSearch,
        ReportKind::InTransitSearch,
        ReportKind::ForecastSearch,
        ReportKind::LatestUpdate,
        ReportKind::LatestFinishedGoodsUpdate,
        ReportKind::CuttingCenterCustomers,
    ];

    /// Wire code carried in `event_type`.
    pub fn code(self) -> &'static str {
        match self {
            ReportKind::TagSearch => "1",
            ReportKind::DirectSaleSearch => "2",
            ReportKind::InTransitSearch => "3",
            ReportKind::ForecastSearch => "4",
            ReportKind::LatestUpdate => "5",
            ReportKind::LatestFinishedGoodsUpdate => "6",
            ReportKind::CuttingCenterCustomers => "8",
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::TagSearch => "search_tag",
            ReportKind::DirectSaleSearch => "search_directsale",
            ReportKind::InTransitSearch => "search_intransit",
            ReportKind::ForecastSearch => "search_forecast",
            ReportKind::LatestUpdate => "get_upd_timestamp",
            ReportKind::LatestFinishedGoodsUpdate => "get_upd_timestamp_fg",
            ReportKind::CuttingCenterCustomers => "search_fg_mc_all_customers",
        }
    }

    /// Parameters that must be present on the event.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            ReportKind::TagSearch | ReportKind::DirectSaleSearch | ReportKind::ForecastSearch => {
                &[PARAM_CUSTOMER]
            }
            ReportKind::InTransitSearch => &[PARAM_CUSTOMER_SHORTNAME],
            ReportKind::LatestUpdate
            | ReportKind::LatestFinishedGoodsUpdate
            | ReportKind::CuttingCenterCustomers => &[],
        }
    }

    /// Parameter carrying the customer list, if this report filters by customer.
    pub fn customer_param(self) -> Option<&'static str> {
        match self {
            ReportKind::TagSearch | ReportKind::DirectSaleSearch | ReportKind::ForecastSearch => {
                Some(PARAM_CUSTOMER)
            }
            ReportKind::InTransitSearch => Some(PARAM_CUSTOMER_SHORTNAME),
            ReportKind::LatestUpdate
            | ReportKind::LatestFinishedGoodsUpdate
            | ReportKind::CuttingCenterCustomers => None,
        }
    }

    /// Whether `AFT` / `COMMON SPEC` aliases are expanded before parsing.
    pub fn expands_aliases(self) -> bool {
        matches!(
            self,
            ReportKind::DirectSaleSearch | ReportKind::InTransitSearch | ReportKind::ForecastSearch
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.code(), self.name())
    }
}

/// `event_type` value that names no report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReport(pub String);

impl fmt::Display for UnknownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unrecognized event_type: {}", self.0)
    }
}

impl std::error::Error for UnknownReport {}

impl FromStr for ReportKind {
    type Err = UnknownReport;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| UnknownReport(code.to_string()))
    }
}

/// Borrowed view over an inbound event object.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Event<'a> {
    /// Wrap a JSON object.
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw `event_type`, rendered as text when the caller sent a number.
    pub fn event_type(&self) -> Option<String> {
        match self.fields.get(EVENT_TYPE_FIELD)? {
            Value::String(code) => Some(code.clone()),
            Value::Number(code) => Some(code.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Whether the event carries `name` at all (any JSON value, including null).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Raw parameter value.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    /// Parameter value when it is a JSON string.
    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
