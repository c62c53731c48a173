//! Transaction service domain logic for the expense tracker.

use anyhow::{anyhow, Result};
use chrono::Local;
use log::info;
use shared::{
    CreateTransactionRequest, SummaryResponse, Transaction, TransactionKind,
    TransactionListRequest, TransactionListResponse, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;

use crate::domain::period::filter_by_period;
use crate::domain::session::SessionHandle;
use crate::domain::summary::SummaryService;
use crate::storage::TransactionStore;

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    session: SessionHandle,
    summary_service: SummaryService,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>, session: SessionHandle) -> Self {
        Self {
            store,
            session,
            summary_service: SummaryService::new(),
        }
    }

    pub async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<Transaction> {
        if request.category.trim().is_empty() {
            return Err(anyhow!("Category must be set"));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(anyhow!("Amount must be a positive number"));
        }
        if request.amount > MAX_AMOUNT {
            return Err(anyhow!("Amount must not exceed {}", MAX_AMOUNT));
        }
        if let Some(description) = &request.description {
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(anyhow!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LENGTH
                ));
            }
        }

        let session = self.session.require()?;

        let now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
        let kind = TransactionKind::from_is_expense(request.is_expense);
        let transaction_id = Transaction::generate_id(kind, now_millis);

        // Date defaults to the device-local calendar date
        let date = request.date.unwrap_or_else(|| Local::now().date_naive());

        let created_at = time::OffsetDateTime::now_utc().format(&Rfc3339)?;

        let transaction = Transaction {
            id: transaction_id,
            user_id: session.profile.id.clone(),
            date,
            amount: request.amount,
            category: request.category,
            kind,
            description: request.description,
            invoice: request.invoice,
            created_at,
        };

        self.store.store_transaction(&transaction).await?;

        info!(
            "Created {} transaction {} for {:.2}",
            transaction.kind, transaction.id, transaction.amount
        );

        Ok(transaction)
    }

    pub async fn list_transactions(
        &self,
        request: TransactionListRequest,
    ) -> Result<TransactionListResponse> {
        let session = self.session.require()?;

        let mut transactions = self.store.list_transactions(&session.profile.id).await?;

        if let Some(period) = request.period {
            let reference = request.date.unwrap_or_else(|| Local::now().date_naive());
            transactions = filter_by_period(&transactions, period, reference);
        }

        // Newest first; same-day records ordered by creation timestamp
        transactions.sort_by(|a, b| {
            b.date.cmp(&a.date).then_with(|| {
                b.extract_timestamp()
                    .unwrap_or(0)
                    .cmp(&a.extract_timestamp().unwrap_or(0))
            })
        });

        Ok(TransactionListResponse { transactions })
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Option<Transaction>> {
        let session = self.session.require()?;
        self.store
            .get_transaction(&session.profile.id, transaction_id)
            .await
    }

    /// Totals over the (optionally period-filtered) transaction list
    pub async fn summarize(&self, request: TransactionListRequest) -> Result<SummaryResponse> {
        let listing = self.list_transactions(request).await?;
        let summary = self.summary_service.summarize(&listing.transactions);

        Ok(SummaryResponse {
            summary,
            transaction_count: listing.transactions.len(),
        })
    }
}
