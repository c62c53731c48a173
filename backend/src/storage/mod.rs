//! # Storage Module
//!
//! Persistence layer for the expense tracker backend.
//!
//! Two interchangeable backends live behind the traits in [`traits`]:
//!
//! - **remote**: the per-user transaction collections of the remote
//!   document store, reached over HTTP/JSON with the session's bearer
//!   token. This is the backend a deployed app runs against.
//! - **csv**: local CSV files, one directory per user. Powers offline
//!   operation and the test suite.
//!
//! The domain layer only ever sees `Arc<dyn TransactionStore>`.

pub mod csv;
pub mod remote;
pub mod traits;

pub use traits::{Connection, TokenProvider, TransactionStore};
