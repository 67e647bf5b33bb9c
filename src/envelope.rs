//! Response envelope returned for every invocation.

use serde::Serialize;

use crate::storage::Record;

/// Fixed message attached to every execution failure.
pub const EXECUTION_FAILED_MESSAGE: &str = "Query execution failed. Logged to S3.";

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_SERVER_ERROR: u16 = 500;

/// Uniform result of one invocation.
///
/// Exactly one field group is set: `count`/`body` on success, `error`/`message`
/// on execution failure, `errorMessage` on a rejected request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResponseEnvelope {
    fn with_status(status_code: u16) -> Self {
        Self {
            status_code,
            count: None,
            body: None,
            error: None,
            message: None,
            error_message: None,
        }
    }

    /// `200` carrying the fetched rows.
    pub fn success(count: u64, body: Vec<Record>) -> Self {
        Self {
            count: Some(count),
            body: Some(body),
            ..Self::with_status(STATUS_OK)
        }
    }

    /// `400` with a free-form rejection message.
    pub fn bad_request(error_message: impl Into<String>) -> Self {
        Self {
            error_message: Some(error_message.into()),
            ..Self::with_status(STATUS_BAD_REQUEST)
        }
    }

    /// `400` naming the absent parameters, in the order given.
    pub fn missing_parameters<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        Self::bad_request(format!("Missing parameters: {}.", names.join(", ")))
    }

    /// `400` for a parameter that is present but unusable.
    pub fn invalid_parameter(name: &str, reason: &str) -> Self {
        Self::bad_request(format!("Invalid parameters: {name} {reason}."))
    }

    /// `400` for an `event_type` with no matching report.
    pub fn unrecognized_event_type(event_type: &str) -> Self {
        Self::bad_request(format!("Unrecognized event_type: {event_type}."))
    }

    /// `500` carrying the raw error text.
    pub fn execution_failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: Some(EXECUTION_FAILED_MESSAGE.to_string()),
            ..Self::with_status(STATUS_SERVER_ERROR)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}
