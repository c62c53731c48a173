//! # Domain Module
//!
//! Business logic for the expense tracker, independent of any UI framework
//! or storage mechanism.
//!
//! ## Module Organization
//!
//! - **transaction_service**: transaction creation, listing, detail lookup
//! - **summary**: income / expense / balance totals
//! - **period**: Day/Week/Month/Year window filtering
//! - **auth_service**: sign-up, sign-in, sign-out, account deletion
//! - **session**: the shared signed-in-session handle
//! - **scan_service**: the receipt scanning pipeline
//! - **receipt_image**: downscale / crop / re-encode of captured photos
//! - **receipt_parser**: free text from the vision model into invoice drafts
//!
//! ## Business Rules
//!
//! - Amounts are non-negative; direction is carried by the transaction kind
//! - Category is always set; the date defaults to the local calendar date
//! - Transactions are immutable once created
//! - Totals are recomputed in full on every request
//! - External-call failures are logged and surfaced as plain messages

pub mod auth_service;
pub mod period;
pub mod receipt_image;
pub mod receipt_parser;
pub mod scan_service;
pub mod session;
pub mod summary;
pub mod transaction_service;

pub use auth_service::*;
pub use scan_service::*;
pub use session::*;
pub use summary::*;
pub use transaction_service::*;
