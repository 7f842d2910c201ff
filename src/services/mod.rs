// Service exports
pub mod api;
pub mod catalog;
pub mod request_log;

pub use api::{restore_order, CatalogApi};
pub use catalog::{CatalogClient, CatalogError, SessionStatus};
pub use request_log::{LogSink, RequestLog, RequestLogEntry, TracingSink};
