//! Period filtering: narrowing a transaction list to the Day/Week/Month/Year
//! window containing a reference date.
//!
//! Comparisons are on calendar dates only. Weeks start on Monday and the
//! 7-day window is inclusive on both ends.

use chrono::{Datelike, Duration, NaiveDate};
use shared::{Period, Transaction};

/// The Monday that starts the week containing `reference`
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(reference.weekday().num_days_from_monday() as i64)
}

/// Whether `date` falls inside the period window anchored at `reference`
pub fn period_contains(period: Period, reference: NaiveDate, date: NaiveDate) -> bool {
    match period {
        Period::Day => date == reference,
        Period::Week => {
            let start = week_start(reference);
            let end = start + Duration::days(6);
            date >= start && date <= end
        }
        Period::Month => date.year() == reference.year() && date.month() == reference.month(),
        Period::Year => date.year() == reference.year(),
    }
}

/// Narrow `transactions` to the period window anchored at `reference`
pub fn filter_by_period(
    transactions: &[Transaction],
    period: Period,
    reference: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| period_contains(period, reference, transaction.date))
        .cloned()
        .collect()
}
