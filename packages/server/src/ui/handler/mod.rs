//! HTTP and SSE endpoint handlers.

mod http;
mod sse;

pub use http::{dashboard_data, health_check, list_connections, thermostat_status};
pub use sse::sse_handler;
