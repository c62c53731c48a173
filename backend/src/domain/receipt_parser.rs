//! Best-effort parser turning the vision model's free-text receipt
//! transcription into structured invoice details.
//!
//! The output is a draft: the user corrects it before anything becomes a
//! transaction, so missing fields are acceptable and nothing here fails
//! hard.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{InvoiceDetails, InvoiceItem};

static TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:grand\s+)?(?:total|amount\s+due)\s*:?\s*\$?([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*$")
        .unwrap()
});

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

static SLASH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

// "Bread 2 x 2.50" style line
static QUANTITY_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(.+?)\s+(\d{1,3})\s*x\s*\$?(\d+(?:\.\d{1,2})?)\s*$").unwrap()
});

// "Bread 2.50" style line, treated as quantity 1
static PRICE_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9 .,'&-]*?)\s+\$?(\d+(?:\.\d{1,2})?)\s*$").unwrap()
});

const NON_ITEM_KEYWORDS: [&str; 6] = ["subtotal", "tax", "vat", "cash", "change", "card"];

/// Parse the extracted text into a draft invoice. Returns `None` when the
/// text carries neither a recognizable vendor nor a total.
pub fn parse_receipt_text(text: &str) -> Option<InvoiceDetails> {
    let total = parse_total(text);
    let invoice_date = parse_date(text);
    let vendor = parse_vendor(text);
    let vendor_address = vendor.as_deref().and_then(|v| parse_address(text, v));
    let items = parse_items(text);

    if vendor.is_none() && total.is_none() {
        return None;
    }

    let total = total.unwrap_or_else(|| items.iter().map(InvoiceItem::total_price).sum());

    Some(InvoiceDetails {
        vendor: vendor.unwrap_or_else(|| "Unknown".to_string()),
        vendor_address,
        invoice_date,
        total,
        items,
    })
}

fn parse_total(text: &str) -> Option<f64> {
    TOTAL_RE
        .captures(text)
        .and_then(|captures| captures[1].replace(',', "").parse::<f64>().ok())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Some(captures) = ISO_DATE_RE.captures(text) {
        return NaiveDate::from_ymd_opt(
            captures[1].parse().ok()?,
            captures[2].parse().ok()?,
            captures[3].parse().ok()?,
        );
    }

    // Day-first, the dominant format on receipts outside the US
    if let Some(captures) = SLASH_DATE_RE.captures(text) {
        return NaiveDate::from_ymd_opt(
            captures[3].parse().ok()?,
            captures[2].parse().ok()?,
            captures[1].parse().ok()?,
        );
    }

    None
}

fn parse_vendor(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            !ISO_DATE_RE.is_match(line)
                && !SLASH_DATE_RE.is_match(line)
                && !TOTAL_RE.is_match(line)
                && !line.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(true)
        })
        .map(|line| line.to_string())
}

/// The line right after the vendor, when it looks like a street address
fn parse_address(text: &str, vendor: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    lines.find(|line| *line == vendor)?;

    let candidate = lines.next()?;
    let looks_like_address = candidate.chars().any(|c| c.is_ascii_digit())
        && candidate.chars().any(|c| c.is_alphabetic())
        && !TOTAL_RE.is_match(candidate)
        && !QUANTITY_ITEM_RE.is_match(candidate)
        && !PRICE_ITEM_RE.is_match(candidate);

    if looks_like_address {
        Some(candidate.to_string())
    } else {
        None
    }
}

fn parse_items(text: &str) -> Vec<InvoiceItem> {
    let mut items = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || TOTAL_RE.is_match(line) {
            continue;
        }
        let lowered = line.to_lowercase();
        if NON_ITEM_KEYWORDS.iter().any(|kw| lowered.starts_with(kw)) {
            continue;
        }

        if let Some(captures) = QUANTITY_ITEM_RE.captures(line) {
            if let (Ok(quantity), Ok(unit_price)) =
                (captures[2].parse::<u32>(), captures[3].parse::<f64>())
            {
                items.push(InvoiceItem {
                    name: captures[1].trim().to_string(),
                    quantity,
                    unit_price,
                });
                continue;
            }
        }

        if let Some(captures) = PRICE_ITEM_RE.captures(line) {
            if let Ok(unit_price) = captures[2].parse::<f64>() {
                items.push(InvoiceItem {
                    name: captures[1].trim().to_string(),
                    quantity: 1,
                    unit_price,
                });
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECEIPT: &str = "\
Corner Market
12 High Street
2024-01-15

Bread 2 x 2.50
Milk 1.20
Coffee beans 1 x 8.00

Subtotal: 13.70
Tax: 1.30
TOTAL: 15.00
Cash 20.00
Change 5.00
";

    #[test]
    fn test_parses_full_receipt() {
        let invoice = parse_receipt_text(SAMPLE_RECEIPT).unwrap();

        assert_eq!(invoice.vendor, "Corner Market");
        assert_eq!(invoice.vendor_address.as_deref(), Some("12 High Street"));
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(invoice.total, 15.0);

        assert_eq!(invoice.items.len(), 3);
        assert_eq!(invoice.items[0].name, "Bread");
        assert_eq!(invoice.items[0].quantity, 2);
        assert_eq!(invoice.items[0].unit_price, 2.5);
        assert_eq!(invoice.items[1].name, "Milk");
        assert_eq!(invoice.items[1].quantity, 1);
        assert_eq!(invoice.items[2].name, "Coffee beans");
    }

    #[test]
    fn test_total_line_variants() {
        assert_eq!(parse_total("Total 42.50"), Some(42.5));
        assert_eq!(parse_total("TOTAL: $42.50"), Some(42.5));
        assert_eq!(parse_total("Grand Total 1,234.56"), Some(1234.56));
        assert_eq!(parse_total("Amount due: 9"), Some(9.0));
        assert_eq!(parse_total("no money here"), None);
    }

    #[test]
    fn test_slash_date_is_day_first() {
        assert_eq!(
            parse_date("Receipt 15/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_missing_total_falls_back_to_item_sum() {
        let text = "Corner Market\nBread 2 x 2.50\nMilk 1.20\n";
        let invoice = parse_receipt_text(text).unwrap();
        assert!((invoice.total - 6.2).abs() < 1e-9);
    }

    #[test]
    fn test_unusable_text_yields_none() {
        assert!(parse_receipt_text("").is_none());
        assert!(parse_receipt_text("12345\n67890\n").is_none());
    }

    #[test]
    fn test_total_without_vendor_still_parses() {
        let invoice = parse_receipt_text("TOTAL: 8.00\n").unwrap();
        assert_eq!(invoice.vendor, "Unknown");
        assert_eq!(invoice.total, 8.0);
        assert!(invoice.items.is_empty());
    }
}
