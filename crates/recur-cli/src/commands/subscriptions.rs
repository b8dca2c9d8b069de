//! Tracked subscription command implementations

use anyhow::{Context, Result};
use chrono::Local;
use recur_core::{
    find_subscription_mut, load_subscriptions, remove_subscription, Subscription,
    SubscriptionStore,
};

use super::{due_label, truncate};

pub fn cmd_subscriptions_list(store: &dyn SubscriptionStore, all: bool) -> Result<()> {
    let subscriptions: Vec<Subscription> = load_subscriptions(store)
        .into_iter()
        .filter(|s| all || s.is_active)
        .collect();

    if subscriptions.is_empty() {
        println!("No subscriptions tracked yet. Run:");
        println!("  recur detect --file transactions.csv");
        return Ok(());
    }

    let today = Local::now().date_naive();

    println!();
    println!("📋 Tracked Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subscriptions {
        let status_icon = if sub.is_active { "✅" } else { "⏸️" };
        let category = match (&sub.category_id, &sub.subcategory_id) {
            (Some(c), Some(s)) => format!("{}/{}", c, s),
            (Some(c), None) => c.clone(),
            _ => "-".to_string(),
        };

        println!(
            "   {} {:22} │ {:>10.2}/{:<9} │ {:<12} │ {:<16} │ next {} ({})",
            status_icon,
            truncate(&sub.recipient_name, 22),
            sub.average_amount,
            sub.billing_frequency.as_str(),
            sub.recurring_type.as_str(),
            truncate(&category, 16),
            sub.next_expected_date,
            due_label(sub.next_expected_date, today)
        );
    }

    let monthly: f64 = subscriptions
        .iter()
        .filter(|s| s.is_active)
        .map(Subscription::monthly_cost)
        .sum();
    println!();
    println!(
        "   💰 Active: {:.2}/month, {:.2}/year",
        monthly,
        monthly * 12.0
    );

    Ok(())
}

/// Load, edit one subscription, and save
fn update_subscription(
    store: &dyn SubscriptionStore,
    name_or_id: &str,
    edit: impl FnOnce(&mut Subscription),
) -> Result<Subscription> {
    let mut subscriptions = store.load().context("Failed to load subscriptions")?;

    let sub = find_subscription_mut(&mut subscriptions, name_or_id)
        .with_context(|| format!("Subscription not found: {}", name_or_id))?;
    edit(sub);
    let updated = sub.clone();

    store
        .save(&subscriptions)
        .context("Failed to save subscriptions")?;
    Ok(updated)
}

pub fn cmd_subscriptions_rename(
    store: &dyn SubscriptionStore,
    name_or_id: &str,
    new_name: &str,
) -> Result<()> {
    let sub = update_subscription(store, name_or_id, |s| s.rename(new_name))?;
    println!("✅ Renamed {} to {}", sub.id, sub.recipient_name);
    Ok(())
}

pub fn cmd_subscriptions_recategorize(
    store: &dyn SubscriptionStore,
    name_or_id: &str,
    category: Option<String>,
    subcategory: Option<String>,
) -> Result<()> {
    let sub = update_subscription(store, name_or_id, |s| s.recategorize(category, subcategory))?;
    println!(
        "✅ {} category: {}",
        sub.recipient_name,
        sub.category_id.as_deref().unwrap_or("none")
    );
    Ok(())
}

pub fn cmd_subscriptions_deactivate(store: &dyn SubscriptionStore, name_or_id: &str) -> Result<()> {
    let sub = update_subscription(store, name_or_id, Subscription::deactivate)?;
    println!("⏸️  {} deactivated (history kept)", sub.recipient_name);
    Ok(())
}

pub fn cmd_subscriptions_delete(store: &dyn SubscriptionStore, name_or_id: &str) -> Result<()> {
    let mut subscriptions = store.load().context("Failed to load subscriptions")?;
    let removed = remove_subscription(&mut subscriptions, name_or_id)?;
    store
        .save(&subscriptions)
        .context("Failed to save subscriptions")?;

    println!("🗑️  Deleted {} ({})", removed.recipient_name, removed.id);
    Ok(())
}
