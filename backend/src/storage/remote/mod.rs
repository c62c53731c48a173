//! Remote document-store backend: per-user transaction collections over
//! HTTP/JSON, authorized with the signed-in session's bearer token.

pub mod connection;
pub mod transaction_repository;

pub use connection::RemoteConnection;
pub use transaction_repository::RemoteTransactionStore;
