//! Income / expense / balance totals over a transaction list.
//!
//! Totals are recomputed in full on every request; with a single user's
//! bounded history there is nothing to cache.

use shared::{Summary, Transaction, TransactionKind};

/// Service computing transaction totals
#[derive(Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Sum income and expense amounts and derive the net balance
    pub fn summarize(&self, transactions: &[Transaction]) -> Summary {
        let mut income = 0.0;
        let mut expense = 0.0;

        for transaction in transactions {
            match transaction.kind {
                TransactionKind::Income => income += transaction.amount,
                TransactionKind::Expense => expense += transaction.amount,
            }
        }

        Summary {
            income,
            expense,
            balance: income - expense,
        }
    }
}
