//! # REST API Interface Layer
//!
//! HTTP endpoints consumed by the UI shell. Each handler deserializes the
//! request, calls the matching domain service, and maps the outcome to a
//! status code: domain rejections become 400s with the message, internal
//! failures become 500s with a generic message, and both are logged.

pub mod auth_apis;
pub mod category_apis;
pub mod scan_apis;
pub mod transaction_apis;

pub use auth_apis::*;
pub use category_apis::*;
pub use scan_apis::*;
pub use transaction_apis::*;
