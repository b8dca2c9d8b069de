//! Confirmed subscription book-keeping
//!
//! Detection is stateless: every run produces fresh [`DetectedSubscription`]s.
//! Once the user confirms a candidate it becomes a [`Subscription`] that is
//! tracked across runs, can be renamed or recategorized, and is persisted via
//! a [`SubscriptionStore`](crate::store::SubscriptionStore).

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{DetectedSubscription, RecurringType, Subscription};

/// Create a tracked subscription from a detection result
pub fn create_subscription(detected: &DetectedSubscription) -> Subscription {
    create_subscription_at(detected, Utc::now())
}

/// Like [`create_subscription`], with an explicit creation time
pub fn create_subscription_at(
    detected: &DetectedSubscription,
    created_at: DateTime<Utc>,
) -> Subscription {
    Subscription {
        id: detected.id.clone(),
        recipient_name: detected.recipient_name.clone(),
        average_amount: detected.average_amount,
        min_amount: detected.min_amount,
        max_amount: detected.max_amount,
        common_day_of_month: detected.common_day_of_month,
        expected_billing_day: detected.expected_billing_day,
        transaction_ids: detected.transaction_ids.clone(),
        occurrence_count: detected.occurrence_count,
        first_seen: detected.first_seen,
        last_seen: detected.last_seen,
        confidence: detected.confidence,
        confidence_level: detected.confidence_level,
        billing_frequency: detected.billing_frequency,
        amount_variance: detected.amount_variance,
        amount_type: detected.amount_type,
        next_expected_date: detected.next_expected_date,
        recurring_type: detected.recurring_type.unwrap_or_default(),
        category_id: detected.category_id.clone(),
        subcategory_id: detected.subcategory_id.clone(),
        score_breakdown: detected.score_breakdown,
        is_active: true,
        created_at,
    }
}

/// Outcome of [`confirm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// A new subscription was added
    Added,
    /// An existing subscription matched; its observations were refreshed
    AlreadyTracked,
}

impl Subscription {
    pub fn rename(&mut self, name: impl Into<String>) {
        self.recipient_name = name.into();
    }

    pub fn recategorize(&mut self, category_id: Option<String>, subcategory_id: Option<String>) {
        self.category_id = category_id;
        self.subcategory_id = subcategory_id;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn set_recurring_type(&mut self, recurring_type: RecurringType) {
        self.recurring_type = recurring_type;
    }

    /// Whether a detection result describes this subscription.
    ///
    /// Ids are derived from the detected name and amount, so a repriced
    /// subscription no longer matches by id and falls back to
    /// (name, whole-unit amount).
    pub fn matches(&self, detected: &DetectedSubscription) -> bool {
        self.id == detected.id
            || (self.recipient_name.eq_ignore_ascii_case(&detected.recipient_name)
                && self.average_amount.round() == detected.average_amount.round())
    }

    /// Take the latest observations from a detection run.
    ///
    /// User edits (name, category, type, active flag) are kept.
    pub fn refresh_from(&mut self, detected: &DetectedSubscription) {
        for id in &detected.transaction_ids {
            if !self.transaction_ids.contains(id) {
                self.transaction_ids.push(id.clone());
            }
        }
        self.occurrence_count = self.transaction_ids.len();
        self.average_amount = detected.average_amount;
        self.min_amount = self.min_amount.min(detected.min_amount);
        self.max_amount = self.max_amount.max(detected.max_amount);
        self.first_seen = self.first_seen.min(detected.first_seen);
        self.last_seen = self.last_seen.max(detected.last_seen);
        self.next_expected_date = detected.next_expected_date;
        self.confidence = detected.confidence;
        self.confidence_level = detected.confidence_level;
        self.amount_variance = detected.amount_variance;
        self.amount_type = detected.amount_type;
        self.score_breakdown = detected.score_breakdown;
    }
}

/// Track a detection result, unless it already is
pub fn confirm(
    subscriptions: &mut Vec<Subscription>,
    detected: &DetectedSubscription,
    recurring_type: Option<RecurringType>,
) -> Confirmation {
    if let Some(existing) = subscriptions.iter_mut().find(|s| s.matches(detected)) {
        debug!(
            "{} already tracked as {}, refreshing",
            detected.recipient_name, existing.id
        );
        existing.refresh_from(detected);
        if let Some(recurring_type) = recurring_type {
            existing.set_recurring_type(recurring_type);
        }
        return Confirmation::AlreadyTracked;
    }

    let mut subscription = create_subscription(detected);
    if let Some(recurring_type) = recurring_type {
        subscription.set_recurring_type(recurring_type);
    }
    info!(
        "Tracking {} ({} {:.2})",
        subscription.recipient_name, subscription.billing_frequency, subscription.average_amount
    );
    subscriptions.push(subscription);
    Confirmation::Added
}

fn position(subscriptions: &[Subscription], id_or_name: &str) -> Option<usize> {
    subscriptions
        .iter()
        .position(|s| s.id == id_or_name)
        .or_else(|| {
            subscriptions
                .iter()
                .position(|s| s.recipient_name.eq_ignore_ascii_case(id_or_name))
        })
}

/// Look up by exact id, else by case-insensitive name
pub fn find_subscription<'a>(
    subscriptions: &'a [Subscription],
    id_or_name: &str,
) -> Option<&'a Subscription> {
    position(subscriptions, id_or_name).map(|i| &subscriptions[i])
}

/// Mutable variant of [`find_subscription`]
pub fn find_subscription_mut<'a>(
    subscriptions: &'a mut [Subscription],
    id_or_name: &str,
) -> Option<&'a mut Subscription> {
    position(subscriptions, id_or_name).map(move |i| &mut subscriptions[i])
}

/// Remove and return a subscription
pub fn remove_subscription(
    subscriptions: &mut Vec<Subscription>,
    id_or_name: &str,
) -> Result<Subscription> {
    let index = position(subscriptions, id_or_name)
        .ok_or_else(|| Error::NotFound(format!("subscription {}", id_or_name)))?;
    Ok(subscriptions.remove(index))
}
