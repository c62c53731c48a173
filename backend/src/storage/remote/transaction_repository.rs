use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use reqwest::StatusCode;
use serde::Deserialize;
use shared::Transaction;

use super::connection::RemoteConnection;
use crate::storage::traits::TransactionStore;

/// Transaction store backed by the remote document store.
///
/// Collection layout: `users/{user_id}/transactions/{transaction_id}`,
/// documents carried as plain JSON. Only the operations the app performs
/// are implemented: add, get, list.
#[derive(Clone)]
pub struct RemoteTransactionStore {
    connection: RemoteConnection,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    documents: Vec<Transaction>,
}

impl RemoteTransactionStore {
    pub fn new(connection: RemoteConnection) -> Self {
        Self { connection }
    }

    fn collection_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/users/{}/transactions",
            self.connection.base_url(),
            user_id
        )
    }

    fn bearer_token(&self) -> Result<String> {
        self.connection
            .tokens()
            .bearer_token()
            .ok_or_else(|| anyhow!("Not signed in"))
    }
}

#[async_trait]
impl TransactionStore for RemoteTransactionStore {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        let token = self.bearer_token()?;
        let url = self.collection_url(&transaction.user_id);
        info!("POST {} - adding transaction {}", url, transaction.id);

        let response = self
            .connection
            .http()
            .post(&url)
            .bearer_auth(token)
            .json(transaction)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Document store rejected write ({}): {}", status, body));
        }

        Ok(())
    }

    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let token = self.bearer_token()?;
        let url = format!("{}/{}", self.collection_url(user_id), transaction_id);

        let response = self
            .connection
            .http()
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("Document store read failed ({})", status));
        }

        Ok(Some(response.json::<Transaction>().await?))
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let token = self.bearer_token()?;
        let url = self.collection_url(user_id);
        info!("GET {} - listing transactions", url);

        let response = self
            .connection
            .http()
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("Document store listing failed ({})", status));
        }

        let listing = response.json::<ListDocumentsResponse>().await?;
        Ok(listing.documents)
    }
}
