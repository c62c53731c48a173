use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a free-form transaction description
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

/// Largest amount a single transaction may carry
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Default category set offered to the UI. Free-form categories are still
/// accepted by the backend; this list only seeds the picker.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Health",
    "Entertainment",
    "Salary",
    "Other",
];

/// Transaction ID in format: "transaction::<income|expense>::epoch_millis"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ID of the user account this transaction belongs to
    pub user_id: String,
    /// Calendar date of the transaction (no time component)
    pub date: NaiveDate,
    /// Transaction amount, always non-negative; direction lives in `kind`
    pub amount: f64,
    /// Category name (always set, never empty)
    pub category: String,
    /// Whether this is money coming in or going out
    pub kind: TransactionKind,
    /// Optional free-form description (max 256 characters)
    pub description: Option<String>,
    /// Structured line-item breakdown, typically from a scanned receipt
    pub invoice: Option<InvoiceDetails>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money added to the account
    Income,
    /// Money spent from the account
    Expense,
}

impl TransactionKind {
    pub fn is_expense(&self) -> bool {
        matches!(self, TransactionKind::Expense)
    }

    pub fn from_is_expense(is_expense: bool) -> Self {
        if is_expense {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured invoice data attached to a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    /// Vendor name as printed on the receipt
    pub vendor: String,
    /// Vendor address, when the receipt carries one
    pub vendor_address: Option<String>,
    /// Invoice date as printed, when recognizable
    pub invoice_date: Option<NaiveDate>,
    /// Invoice grand total
    pub total: f64,
    /// Line items, possibly empty when extraction found none
    pub items: Vec<InvoiceItem>,
}

/// A single invoice line item. Owned by exactly one transaction's invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl InvoiceItem {
    /// Line total: quantity x unit price
    pub fn total_price(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// A named time-window granularity used to filter transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(PeriodParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown period '{}'", self.0)
    }
}

impl std::error::Error for PeriodParseError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Transaction amount; must be positive and finite
    pub amount: f64,
    /// Category name; must be non-empty
    pub category: String,
    /// Direction flag as entered on the form
    pub is_expense: bool,
    /// Optional date override; defaults to the current local date
    pub date: Option<NaiveDate>,
    /// Optional free-form description (max 256 characters)
    pub description: Option<String>,
    /// Optional structured invoice details, typically from a confirmed scan
    pub invoice: Option<InvoiceDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    /// Narrow the listing to a period window around `date`
    pub period: Option<Period>,
    /// Reference date for the period filter; defaults to the current local date
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

/// Income / expense / balance totals over a transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Summary,
    /// Number of transactions the totals were computed over
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<String>,
}

/// Signed-in user profile as reported by the authentication service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub profile: UserProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Option<UserProfile>,
}

/// Result of running a captured receipt through the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReceiptResponse {
    /// Handle for the pending scan, used by confirm/discard
    pub scan_id: String,
    /// Raw text returned by the vision model, for manual correction
    pub extracted_text: String,
    /// Best-effort structured draft parsed from the text
    pub draft: Option<InvoiceDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmScanRequest {
    pub scan_id: String,
    /// The user-corrected transaction input
    pub transaction: CreateTransactionRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardScanRequest {
    pub scan_id: String,
}

impl Transaction {
    /// Generate transaction ID from direction and timestamp
    pub fn generate_id(kind: TransactionKind, epoch_millis: u64) -> String {
        format!("transaction::{}::{}", kind.as_str(), epoch_millis)
    }

    /// Parse transaction ID to extract components
    pub fn parse_id(id: &str) -> Result<(TransactionKind, u64), TransactionIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "transaction" {
            return Err(TransactionIdError::InvalidFormat);
        }

        let kind = match parts[1] {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            _ => return Err(TransactionIdError::InvalidKind),
        };

        let epoch_millis = parts[2]
            .parse::<u64>()
            .map_err(|_| TransactionIdError::InvalidTimestamp)?;

        Ok((kind, epoch_millis))
    }

    /// Extract epoch timestamp from transaction ID for sorting
    pub fn extract_timestamp(&self) -> Result<u64, TransactionIdError> {
        Self::parse_id(&self.id).map(|(_, timestamp)| timestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionIdError {
    InvalidFormat,
    InvalidKind,
    InvalidTimestamp,
}

impl fmt::Display for TransactionIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionIdError::InvalidFormat => write!(f, "Invalid transaction ID format"),
            TransactionIdError::InvalidKind => write!(f, "Invalid transaction kind"),
            TransactionIdError::InvalidTimestamp => write!(f, "Invalid timestamp in transaction ID"),
        }
    }
}

impl std::error::Error for TransactionIdError {}

/// Clean and validate a user-typed amount string.
///
/// Accepts an optional currency symbol prefix and thousands separators,
/// rejects non-positive, non-finite, and oversized values.
pub fn parse_amount(input: &str) -> Result<f64, AmountParseError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let value = cleaned
        .parse::<f64>()
        .map_err(|_| AmountParseError::InvalidFormat(input.to_string()))?;

    if !value.is_finite() {
        return Err(AmountParseError::InvalidFormat(input.to_string()));
    }
    if value <= 0.0 {
        return Err(AmountParseError::NotPositive);
    }
    if value > MAX_AMOUNT {
        return Err(AmountParseError::TooLarge(value));
    }

    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
pub enum AmountParseError {
    Empty,
    InvalidFormat(String),
    NotPositive,
    TooLarge(f64),
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountParseError::Empty => write!(f, "Amount is empty"),
            AmountParseError::InvalidFormat(input) => write!(f, "'{}' is not a valid amount", input),
            AmountParseError::NotPositive => write!(f, "Amount must be positive"),
            AmountParseError::TooLarge(value) => write!(f, "Amount {} is too large", value),
        }
    }
}

impl std::error::Error for AmountParseError {}
