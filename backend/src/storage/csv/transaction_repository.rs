use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::info;
use shared::{InvoiceDetails, Transaction, TransactionKind};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};

use super::connection::CsvConnection;
use crate::storage::traits::TransactionStore;

/// CSV-based transaction repository
#[derive(Clone)]
pub struct TransactionRepository {
    connection: CsvConnection,
}

impl TransactionRepository {
    /// Create a new CSV transaction repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read all transactions for a user from their CSV file
    fn read_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.connection.ensure_transactions_file_exists(user_id)?;

        let file_path = self.connection.get_transactions_file_path(user_id);
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut transactions = Vec::new();

        for result in csv_reader.records() {
            let record = result?;

            let date_field = record.get(2).unwrap_or("");
            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
                .map_err(|e| anyhow!("Bad date '{}' in {}: {}", date_field, file_path.display(), e))?;

            // The invoice column holds a JSON blob, or is empty
            let invoice: Option<InvoiceDetails> = match record.get(7) {
                Some("") | None => None,
                Some(json) => Some(serde_json::from_str(json)?),
            };

            let description = match record.get(6) {
                Some("") | None => None,
                Some(text) => Some(text.to_string()),
            };

            let transaction = Transaction {
                id: record.get(0).unwrap_or("").to_string(),
                user_id: record.get(1).unwrap_or("").to_string(),
                date,
                amount: record.get(3).unwrap_or("0").parse::<f64>().unwrap_or(0.0),
                category: record.get(4).unwrap_or("").to_string(),
                kind: match record.get(5) {
                    Some("expense") => TransactionKind::Expense,
                    _ => TransactionKind::Income,
                },
                description,
                invoice,
                created_at: record.get(8).unwrap_or("").to_string(),
            };

            transactions.push(transaction);
        }

        Ok(transactions)
    }

    /// Write all transactions for a user to their CSV file
    fn write_transactions(&self, user_id: &str, transactions: &[Transaction]) -> Result<()> {
        self.connection.ensure_transactions_file_exists(user_id)?;
        let file_path = self.connection.get_transactions_file_path(user_id);

        // Write to a temporary file, then rename for an atomic replace
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let writer = BufWriter::new(file);
            let mut csv_writer = Writer::from_writer(writer);

            csv_writer.write_record([
                "id",
                "user_id",
                "date",
                "amount",
                "category",
                "kind",
                "description",
                "invoice",
                "created_at",
            ])?;

            for transaction in transactions {
                let invoice_json = match &transaction.invoice {
                    Some(invoice) => serde_json::to_string(invoice)?,
                    None => String::new(),
                };
                let date = transaction.date.format("%Y-%m-%d").to_string();
                let amount = transaction.amount.to_string();

                csv_writer.write_record([
                    transaction.id.as_str(),
                    transaction.user_id.as_str(),
                    date.as_str(),
                    amount.as_str(),
                    transaction.category.as_str(),
                    transaction.kind.as_str(),
                    transaction.description.as_deref().unwrap_or(""),
                    invoice_json.as_str(),
                    transaction.created_at.as_str(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        Ok(())
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        info!(
            "Storing transaction in CSV for user '{}': {}",
            transaction.user_id, transaction.id
        );

        let mut transactions = self.read_transactions(&transaction.user_id)?;
        transactions.push(transaction.clone());
        transactions.sort_by(|a, b| a.date.cmp(&b.date));

        self.write_transactions(&transaction.user_id, &transactions)
    }

    async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Option<Transaction>> {
        let transactions = self.read_transactions(user_id)?;
        Ok(transactions.into_iter().find(|t| t.id == transaction_id))
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.read_transactions(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::InvoiceItem;
    use tempfile::TempDir;

    fn test_repository() -> (TransactionRepository, TempDir) {
        let temp = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp.path()).unwrap();
        (TransactionRepository::new(connection), temp)
    }

    fn sample_transaction(id_millis: u64, amount: f64, kind: TransactionKind) -> Transaction {
        Transaction {
            id: Transaction::generate_id(kind, id_millis),
            user_id: "user-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount,
            category: "Food".to_string(),
            kind,
            description: Some("Lunch".to_string()),
            invoice: None,
            created_at: "2024-01-15T12:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_list_round_trip() {
        let (repo, _temp) = test_repository();

        let transaction = sample_transaction(1, 12.5, TransactionKind::Expense);
        repo.store_transaction(&transaction).await.unwrap();

        let listed = repo.list_transactions("user-1").await.unwrap();
        assert_eq!(listed, vec![transaction]);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_invoice_details() {
        let (repo, _temp) = test_repository();

        let mut transaction = sample_transaction(2, 40.0, TransactionKind::Expense);
        transaction.invoice = Some(InvoiceDetails {
            vendor: "Corner Market".to_string(),
            vendor_address: Some("12 High St".to_string()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            total: 40.0,
            items: vec![
                InvoiceItem {
                    name: "Bread".to_string(),
                    quantity: 2,
                    unit_price: 2.5,
                },
                InvoiceItem {
                    name: "Milk, 1L".to_string(),
                    quantity: 1,
                    unit_price: 1.2,
                },
            ],
        });

        repo.store_transaction(&transaction).await.unwrap();

        let listed = repo.list_transactions("user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].invoice, transaction.invoice);
    }

    #[tokio::test]
    async fn test_get_transaction_by_id() {
        let (repo, _temp) = test_repository();

        let first = sample_transaction(3, 5.0, TransactionKind::Expense);
        let second = sample_transaction(4, 100.0, TransactionKind::Income);
        repo.store_transaction(&first).await.unwrap();
        repo.store_transaction(&second).await.unwrap();

        let found = repo.get_transaction("user-1", &second.id).await.unwrap();
        assert_eq!(found, Some(second));

        let missing = repo
            .get_transaction("user-1", "transaction::income::999")
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (repo, _temp) = test_repository();

        let mut mine = sample_transaction(5, 10.0, TransactionKind::Income);
        mine.user_id = "user-1".to_string();
        let mut theirs = sample_transaction(6, 20.0, TransactionKind::Income);
        theirs.user_id = "user-2".to_string();

        repo.store_transaction(&mine).await.unwrap();
        repo.store_transaction(&theirs).await.unwrap();

        let listed = repo.list_transactions("user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, "user-1");
    }

    #[tokio::test]
    async fn test_empty_listing_for_new_user() {
        let (repo, _temp) = test_repository();
        let listed = repo.list_transactions("brand-new").await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_description_with_commas_survives() {
        let (repo, _temp) = test_repository();

        let mut transaction = sample_transaction(7, 9.99, TransactionKind::Expense);
        transaction.description = Some("Coffee, cake, and a sandwich".to_string());
        repo.store_transaction(&transaction).await.unwrap();

        let listed = repo.list_transactions("user-1").await.unwrap();
        assert_eq!(
            listed[0].description.as_deref(),
            Some("Coffee, cake, and a sandwich")
        );
    }
}
