//! Recurring-payment detection
//!
//! Turns a flat list of bank transactions into recurring-payment candidates:
//!
//! 1. Expenses are grouped by normalized recipient ([`grouping`])
//! 2. Each group's dates are matched against known cadences ([`frequency`])
//! 3. Groups too small for their cadence are dropped
//! 4. Amounts are profiled for consistency ([`amount`])
//! 5. Groups where too few amounts match are dropped
//! 6. Survivors are scored ([`scoring`]) and filtered by `min_confidence`
//! 7. Remaining groups become [`DetectedSubscription`]s ([`synthesize`])
//!
//! Results are sorted by descending confidence. Ties keep the order in which
//! their recipient was first seen in the input.

pub mod amount;
pub mod frequency;
pub mod grouping;
pub mod scoring;
pub mod stats;
pub mod synthesize;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{DetectedSubscription, Transaction};

pub use amount::{analyze_amounts, AmountProfile};
pub use frequency::{analyze_frequency, FrequencyMatch, CADENCES};
pub use grouping::{group_by_recipient, RecipientGroup};
pub use scoring::{score_confidence, ConfidenceResult, DEFAULT_MIN_CONFIDENCE};
pub use synthesize::{subscription_id, synthesize};

/// Detection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum confidence (0-100) a candidate needs to be reported
    pub min_confidence: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl DetectionConfig {
    pub fn with_min_confidence(min_confidence: u32) -> Self {
        Self { min_confidence }
    }

    /// Reject thresholds outside 0-100
    pub fn validate(&self) -> Result<()> {
        if self.min_confidence > 100 {
            return Err(Error::Config(format!(
                "min_confidence must be between 0 and 100, got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }

    /// Threshold actually applied during detection
    fn effective_min_confidence(&self) -> u32 {
        if self.min_confidence > 100 {
            warn!(
                "min_confidence {} is out of range, clamping to 100",
                self.min_confidence
            );
            100
        } else {
            self.min_confidence
        }
    }
}

/// Counts of what happened to each group during a detection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub transactions_seen: usize,
    pub expenses_considered: usize,
    pub groups_examined: usize,
    pub rejected_no_cadence: usize,
    pub rejected_too_few_occurrences: usize,
    pub rejected_amount_mismatch: usize,
    pub rejected_low_confidence: usize,
    pub detected: usize,
}

impl DetectionReport {
    pub fn rejected(&self) -> usize {
        self.rejected_no_cadence
            + self.rejected_too_few_occurrences
            + self.rejected_amount_mismatch
            + self.rejected_low_confidence
    }
}

/// Detect recurring payments with the default threshold
pub fn detect_subscriptions(transactions: &[Transaction]) -> Vec<DetectedSubscription> {
    detect_subscriptions_with_config(transactions, &DetectionConfig::default())
}

/// Detect recurring payments with an explicit configuration
pub fn detect_subscriptions_with_config(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> Vec<DetectedSubscription> {
    detect_subscriptions_with_report(transactions, config).0
}

/// Detect recurring payments and report why groups were rejected
pub fn detect_subscriptions_with_report(
    transactions: &[Transaction],
    config: &DetectionConfig,
) -> (Vec<DetectedSubscription>, DetectionReport) {
    let min_confidence = config.effective_min_confidence();
    let mut report = DetectionReport {
        transactions_seen: transactions.len(),
        expenses_considered: transactions.iter().filter(|tx| tx.is_expense()).count(),
        ..Default::default()
    };

    let groups = group_by_recipient(transactions);
    report.groups_examined = groups.len();

    let mut detected = Vec::new();
    for group in &groups {
        if let Some(subscription) = evaluate_group(group, min_confidence, &mut report) {
            detected.push(subscription);
        }
    }

    // Stable sort keeps first-seen order among equal scores
    detected.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    report.detected = detected.len();

    info!(
        "Detected {} recurring payments from {} transactions ({} groups, {} rejected)",
        report.detected,
        report.transactions_seen,
        report.groups_examined,
        report.rejected()
    );

    (detected, report)
}

/// Run one recipient group through the pipeline
fn evaluate_group(
    group: &RecipientGroup<'_>,
    min_confidence: u32,
    report: &mut DetectionReport,
) -> Option<DetectedSubscription> {
    let count = group.transactions.len();

    let mut dates: Vec<_> = group.transactions.iter().map(|tx| tx.date).collect();
    dates.sort();

    let Some(frequency) = analyze_frequency(&dates) else {
        debug!("{}: no billing cadence in {} charges", group.name, count);
        report.rejected_no_cadence += 1;
        return None;
    };

    if count < frequency.min_occurrences {
        debug!(
            "{}: {} charges, {} needs at least {}",
            group.name, count, frequency.cadence, frequency.min_occurrences
        );
        report.rejected_too_few_occurrences += 1;
        return None;
    }

    let amounts: Vec<f64> = group.transactions.iter().map(|tx| tx.amount).collect();
    let amount = analyze_amounts(&amounts);

    let required = frequency.min_occurrences.max(count.div_ceil(2));
    if amount.matching_count < required {
        debug!(
            "{}: only {} of {} amounts near {:.2} (need {})",
            group.name, amount.matching_count, count, amount.core_amount, required
        );
        report.rejected_amount_mismatch += 1;
        return None;
    }

    let confidence = score_confidence(&amount, Some(&frequency), count, count);
    if confidence.confidence < min_confidence {
        debug!(
            "{}: confidence {} below threshold {}",
            group.name, confidence.confidence, min_confidence
        );
        report.rejected_low_confidence += 1;
        return None;
    }

    debug!(
        "{}: {} {} charges, confidence {}",
        group.name, count, frequency.cadence, confidence.confidence
    );

    Some(synthesize(
        &group.name,
        &group.transactions,
        &frequency,
        &amount,
        &confidence,
    ))
}
