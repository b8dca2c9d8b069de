//! Detection command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use recur_core::{
    confirm, load_subscriptions, AmountType, AppConfig, Confirmation, DetectedSubscription,
    DetectionReport, RecurringType, SubscriptionStore,
};

use super::{run_detection, truncate};

fn print_report(report: &DetectionReport) {
    println!(
        "   {} transactions, {} expenses, {} merchants examined",
        report.transactions_seen, report.expenses_considered, report.groups_examined
    );
    if report.rejected() > 0 {
        println!(
            "   Skipped: {} irregular, {} too few charges, {} inconsistent amounts, {} low confidence",
            report.rejected_no_cadence,
            report.rejected_too_few_occurrences,
            report.rejected_amount_mismatch,
            report.rejected_low_confidence
        );
    }
}

pub fn cmd_detect(
    config: &AppConfig,
    store: &dyn SubscriptionStore,
    file: &Path,
    min_confidence: Option<u32>,
    json: bool,
) -> Result<()> {
    let (detected, report) = run_detection(config, file, min_confidence)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detected)?);
        return Ok(());
    }

    if detected.is_empty() {
        println!("No recurring payments found.");
        print_report(&report);
        return Ok(());
    }

    let tracked = load_subscriptions(store);

    println!();
    println!("🔍 Recurring Payments ({} found)", detected.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &detected {
        let icon = if tracked.iter().any(|t| t.matches(sub)) {
            "📌"
        } else {
            "🆕"
        };
        let amount_str = match sub.amount_type {
            AmountType::Fixed => format!("{:.2}", sub.average_amount),
            AmountType::Variable => format!("~{:.2}", sub.average_amount),
        };

        println!(
            "   {} {:22} │ {:>10} {:<9} │ {:>3}% {:<6} │ next {} │ {}",
            icon,
            truncate(&sub.recipient_name, 22),
            amount_str,
            sub.billing_frequency.as_str(),
            sub.confidence,
            sub.confidence_level.as_str(),
            sub.next_expected_date,
            sub.id
        );
    }

    let monthly: f64 = detected.iter().map(DetectedSubscription::monthly_cost).sum();
    println!();
    println!(
        "   💰 Projected: {:.2}/month, {:.2}/year",
        monthly,
        monthly * 12.0
    );
    print_report(&report);
    println!();
    println!("Track them with:");
    println!("  recur confirm --file {} --all", file.display());

    Ok(())
}

/// Pick detected payments by id (or name), or all of them
fn select<'a>(
    detected: &'a [DetectedSubscription],
    ids: &[String],
    all: bool,
) -> Result<Vec<&'a DetectedSubscription>> {
    if all {
        return Ok(detected.iter().collect());
    }

    ids.iter()
        .map(|id| {
            detected
                .iter()
                .find(|d| d.id == *id || d.recipient_name.eq_ignore_ascii_case(id))
                .with_context(|| format!("No detected payment matches {}", id))
        })
        .collect()
}

pub fn cmd_confirm(
    config: &AppConfig,
    store: &dyn SubscriptionStore,
    file: &Path,
    ids: &[String],
    all: bool,
    recurring_type: Option<&str>,
    min_confidence: Option<u32>,
) -> Result<()> {
    if !all && ids.is_empty() {
        bail!("Nothing to confirm: pass --id ID (repeatable) or --all");
    }

    let recurring_type = recurring_type
        .map(|s| s.parse::<RecurringType>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let (detected, _report) = run_detection(config, file, min_confidence)?;
    let selected = select(&detected, ids, all)?;

    let mut subscriptions = store.load().context("Failed to load subscriptions")?;
    let mut added = 0;

    for candidate in selected {
        match confirm(&mut subscriptions, candidate, recurring_type) {
            Confirmation::Added => {
                added += 1;
                println!(
                    "✅ Tracking {} ({:.2} {})",
                    candidate.recipient_name,
                    candidate.average_amount,
                    candidate.billing_frequency
                );
            }
            Confirmation::AlreadyTracked => {
                println!("📌 {} already tracked, updated", candidate.recipient_name);
            }
        }
    }

    store
        .save(&subscriptions)
        .context("Failed to save subscriptions")?;

    println!(
        "   {} new, {} tracked in total",
        added,
        subscriptions.len()
    );

    Ok(())
}
