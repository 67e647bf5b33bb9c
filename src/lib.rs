//! Report Router - canned warehouse reports behind a single event entry point
//!
//! An inbound event names one of a fixed set of reports by `event_type` and
//! carries its parameters. The router validates them, normalizes customer
//! lists, composes a parameterized MySQL statement, runs it and returns a
//! uniform [`envelope::ResponseEnvelope`]. Execution failures are logged to
//! an [`error_sink::ErrorSink`] before the `500` envelope is returned.

pub mod config;
pub mod customers;
pub mod envelope;
pub mod error_sink;
pub mod event;
pub mod query;
pub mod reporter;
pub mod router;
pub mod storage;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use envelope::ResponseEnvelope;
pub use event::ReportKind;
pub use router::{ReportRouter, RouterError};
