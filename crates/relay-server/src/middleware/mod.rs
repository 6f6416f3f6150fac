//! Middleware applied to every request:
//! - `RequestIdLayer`: assigns or propagates `X-Request-Id`
//! - `LoggingLayer`: one tracing span per request
//! - `record_request`: feeds the request statistics

mod logging;
mod request_id;
mod stats;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
pub use stats::record_request;
