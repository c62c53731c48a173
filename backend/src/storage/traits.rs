//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::Transaction;
use std::sync::Arc;

/// Trait defining the interface for transaction storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work against either the remote document
/// store or the local CSV files without modification.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Store a new transaction in the user's collection
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Retrieve a specific transaction by ID
    async fn get_transaction(&self, user_id: &str, transaction_id: &str)
        -> Result<Option<Transaction>>;

    /// List all transactions in the user's collection.
    /// Ordering is not guaranteed; callers sort as needed.
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;
}

/// Supplies the bearer token for outbound calls that act on behalf of the
/// signed-in user. Implemented by the session handle in the domain layer.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts the concrete connection type (remote document store, CSV
/// directory) behind a repository factory, so backend selection is a
/// configuration concern rather than a compile-time one.
pub trait Connection: Send + Sync {
    /// Create a transaction store for this connection
    fn create_transaction_store(&self) -> Arc<dyn TransactionStore>;
}
