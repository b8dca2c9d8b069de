//! Building `DetectedSubscription` records from qualifying groups

use chrono::Datelike;
use sha2::{Digest, Sha256};

use super::amount::AmountProfile;
use super::frequency::FrequencyMatch;
use super::scoring::ConfidenceResult;
use super::stats::mode;
use crate::models::{DetectedSubscription, Transaction};

/// Stable id from recipient name and core amount (in cents)
pub fn subscription_id(recipient_name: &str, core_amount: f64) -> String {
    let cents = (core_amount * 100.0).round() as i64;
    let mut hasher = Sha256::new();
    hasher.update(recipient_name.as_bytes());
    hasher.update(b"|");
    hasher.update(cents.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("sub_{}", &digest[..16])
}

/// The shared value of a field, or `None` if any member differs
fn unanimous<'a>(
    members: &[&'a Transaction],
    field: impl Fn(&'a Transaction) -> Option<&'a String>,
) -> Option<String> {
    let (first, rest) = members.split_first()?;
    let value = field(*first)?;
    rest.iter()
        .all(|tx| field(*tx) == Some(value))
        .then(|| value.clone())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turn a scored group into a detected subscription.
///
/// `members` may be in any order; they are sorted by date here.
pub fn synthesize(
    recipient_name: &str,
    members: &[&Transaction],
    frequency: &FrequencyMatch,
    amount: &AmountProfile,
    confidence: &ConfidenceResult,
) -> DetectedSubscription {
    let mut sorted: Vec<&Transaction> = members.to_vec();
    sorted.sort_by_key(|tx| tx.date);

    let absolute: Vec<f64> = sorted.iter().map(|tx| tx.amount.abs()).collect();
    let count = absolute.len();
    let average_amount = if count == 0 {
        0.0
    } else {
        round_cents(absolute.iter().sum::<f64>() / count as f64)
    };
    let min_amount = absolute.iter().copied().fold(f64::INFINITY, f64::min);
    let max_amount = absolute.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let first_seen = sorted.first().map(|tx| tx.date).unwrap_or_default();
    let last_seen = sorted.last().map(|tx| tx.date).unwrap_or_default();

    let common_day_of_month = mode(sorted.iter().map(|tx| tx.date.day())).unwrap_or(1);
    let expected_billing_day = if frequency.cadence.bills_on_weekday() {
        mode(sorted.iter().map(|tx| tx.date.weekday().number_from_monday())).unwrap_or(1)
    } else {
        common_day_of_month
    };

    DetectedSubscription {
        id: subscription_id(recipient_name, amount.core_amount),
        recipient_name: recipient_name.to_string(),
        average_amount,
        min_amount: if count == 0 { 0.0 } else { min_amount },
        max_amount: if count == 0 { 0.0 } else { max_amount },
        common_day_of_month,
        expected_billing_day,
        transaction_ids: sorted.iter().map(|tx| tx.id.clone()).collect(),
        occurrence_count: count,
        first_seen,
        last_seen,
        confidence: confidence.confidence,
        confidence_level: confidence.level,
        billing_frequency: frequency.cadence,
        amount_variance: amount.relative_variance,
        amount_type: amount.amount_type,
        next_expected_date: frequency.cadence.advance(last_seen),
        recurring_type: None,
        category_id: unanimous(&sorted, |tx| tx.category_id.as_ref()),
        subcategory_id: unanimous(&sorted, |tx| tx.subcategory_id.as_ref()),
        score_breakdown: confidence.breakdown,
    }
}
