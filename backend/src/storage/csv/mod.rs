//! CSV storage backend: one directory per user, `transactions.csv` inside.

pub mod connection;
pub mod transaction_repository;

pub use connection::CsvConnection;
pub use transaction_repository::TransactionRepository;
