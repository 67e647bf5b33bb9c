//! Request validation.
//!
//! Every check returns the `400` envelope to send back, so the router can
//! short-circuit with `?`. Nothing here touches the warehouse or the sink.

#![allow(clippy::result_large_err)]

use tracing::warn;

use crate::customers;
use crate::envelope::ResponseEnvelope;
use crate::event::{Event, ReportKind, EVENT_TYPE_FIELD};

/// Reasons attached to `Invalid parameters` rejections.
pub mod errmsg {
    pub const NOT_A_STRING: &str = "must be a string";
    pub const BLANK: &str = "must not be blank";
}

/// Report the required parameters absent from `event`.
///
/// Names keep the order of `required`. Returns `None` when all are present.
pub fn missing_params(event: &Event<'_>, required: &[&str]) -> Option<ResponseEnvelope> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !event.contains(name))
        .collect();

    if missing.is_empty() {
        return None;
    }

    warn!(missing = ?missing, "Rejected event with missing parameters");
    Some(ResponseEnvelope::missing_parameters(&missing))
}

/// Resolve the event's `event_type` to a report.
pub fn validate_report(event: &Event<'_>) -> Result<ReportKind, ResponseEnvelope> {
    if let Some(rejection) = missing_params(event, &[EVENT_TYPE_FIELD]) {
        return Err(rejection);
    }

    let code = event.event_type().unwrap_or_default();
    code.parse::<ReportKind>().map_err(|e| {
        warn!(event_type = %e.0, "Rejected unrecognized event_type");
        ResponseEnvelope::unrecognized_event_type(&e.0)
    })
}

/// Check the parameters `report` needs.
///
/// Required parameters must be present and be strings; the customer list
/// must name at least one customer.
pub fn validate_params(event: &Event<'_>, report: ReportKind) -> Result<(), ResponseEnvelope> {
    let required = report.required_params();
    if let Some(rejection) = missing_params(event, required) {
        return Err(rejection);
    }

    for name in required {
        if event.get_str(name).is_none() {
            warn!(param = %name, report = %report, "Rejected non-string parameter");
            return Err(ResponseEnvelope::invalid_parameter(name, errmsg::NOT_A_STRING));
        }
    }

    if let Some(param) = report.customer_param() {
        let raw = event.get_str(param).unwrap_or_default();
        if customers::normalize(raw).is_err() {
            warn!(param = %param, report = %report, "Rejected blank customer list");
            return Err(ResponseEnvelope::invalid_parameter(param, errmsg::BLANK));
        }
    }

    Ok(())
}
