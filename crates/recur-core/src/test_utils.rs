//! Test utilities for recur-core
//!
//! Builders for transactions and recurring charge series used by unit tests
//! here and by the CLI's tests (via the `test-utils` feature).

use chrono::{DateTime, Days, Months, NaiveDate, TimeZone, Utc};

use crate::detect::detect_subscriptions;
use crate::models::{BillingFrequency, DetectedSubscription, Transaction};

/// Parse a `YYYY-MM-DD` literal
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Build an uncategorized transaction
pub fn tx(id: &str, date_str: &str, amount: f64, description: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: date(date_str),
        amount,
        description: description.to_string(),
        category_id: None,
        subcategory_id: None,
    }
}

/// Build a transaction with category ids
pub fn categorized_tx(
    id: &str,
    date_str: &str,
    amount: f64,
    description: &str,
    category_id: &str,
    subcategory_id: &str,
) -> Transaction {
    Transaction {
        category_id: Some(category_id.to_string()),
        subcategory_id: Some(subcategory_id.to_string()),
        ..tx(id, date_str, amount, description)
    }
}

/// One charge per billing period starting at `start`, with one amount per charge.
///
/// Ids are `{prefix}-{n}` starting at 1. Month-based cadences step by
/// calendar month from `start`, so the 15th stays the 15th.
pub fn series(
    prefix: &str,
    description: &str,
    start: &str,
    frequency: BillingFrequency,
    amounts: &[f64],
) -> Vec<Transaction> {
    let start = date(start);
    amounts
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            let n = i as u32;
            let when = match frequency {
                BillingFrequency::Weekly => start + Days::new(7 * n as u64),
                BillingFrequency::Biweekly => start + Days::new(14 * n as u64),
                BillingFrequency::Monthly => start + Months::new(n),
                BillingFrequency::Quarterly => start + Months::new(3 * n),
                BillingFrequency::Annual => start + Months::new(12 * n),
            };
            Transaction {
                id: format!("{}-{}", prefix, i + 1),
                date: when,
                amount,
                description: description.to_string(),
                category_id: None,
                subcategory_id: None,
            }
        })
        .collect()
}

/// A fixed timestamp for `created_at` assertions
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Detection result for four identical monthly charges from 2024-01-15
pub fn detected(description: &str, amount: f64) -> DetectedSubscription {
    let prefix: String = description
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    let transactions = series(
        &prefix,
        description,
        "2024-01-15",
        BillingFrequency::Monthly,
        &[amount; 4],
    );
    detect_subscriptions(&transactions)
        .into_iter()
        .next()
        .unwrap()
}
