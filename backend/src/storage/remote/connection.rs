use std::sync::Arc;

use crate::storage::traits::{Connection, TokenProvider, TransactionStore};
use super::transaction_repository::RemoteTransactionStore;

/// Connection to the remote document store.
///
/// Holds the shared HTTP client, the store's base URL, and the token
/// provider used to authorize requests on behalf of the signed-in user.
#[derive(Clone)]
pub struct RemoteConnection {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RemoteConnection {
    pub fn new(http: reqwest::Client, base_url: String, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> Arc<dyn TokenProvider> {
        self.tokens.clone()
    }
}

impl Connection for RemoteConnection {
    fn create_transaction_store(&self) -> Arc<dyn TransactionStore> {
        Arc::new(RemoteTransactionStore::new(self.clone()))
    }
}
