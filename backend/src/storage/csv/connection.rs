use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::storage::traits::{Connection, TransactionStore};
use super::transaction_repository::TransactionRepository;

/// CsvConnection manages file paths and ensures CSV files exist for each user
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a new CSV connection in the default data directory
    pub fn new_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join("expense-tracker");

        info!("Using CSV data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    /// Get the directory path for a user's data
    pub fn get_user_directory(&self, user_id: &str) -> PathBuf {
        self.base_directory.join(Self::safe_directory_name(user_id))
    }

    /// Get the path to a user's transactions file
    pub fn get_transactions_file_path(&self, user_id: &str) -> PathBuf {
        self.get_user_directory(user_id).join("transactions.csv")
    }

    /// Make sure the user's directory and transactions file exist
    pub fn ensure_transactions_file_exists(&self, user_id: &str) -> Result<()> {
        let user_dir = self.get_user_directory(user_id);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }

        let file_path = self.get_transactions_file_path(user_id);
        if !file_path.exists() {
            fs::write(
                &file_path,
                "id,user_id,date,amount,category,kind,description,invoice,created_at\n",
            )?;
            info!("Created transactions file: {}", file_path.display());
        }

        Ok(())
    }

    /// Reduce a user ID to a filesystem-safe directory name
    fn safe_directory_name(user_id: &str) -> String {
        user_id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

impl Connection for CsvConnection {
    fn create_transaction_store(&self) -> Arc<dyn TransactionStore> {
        Arc::new(TransactionRepository::new(self.clone()))
    }
}
