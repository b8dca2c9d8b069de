//! Recur Core Library
//!
//! Recurring-payment detection for the recur personal finance tool:
//! - Merchant name normalization
//! - Subscription detection (cadence, amount and confidence analysis)
//! - Confirmed subscription book-keeping
//! - Pluggable subscription stores (JSON file, in-memory)
//! - Transaction CSV/JSON readers
//! - Layered TOML configuration

pub mod config;
pub mod detect;
pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod store;
pub mod subscriptions;

/// Test utilities: transaction builders and charge series
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{load_config, AppConfig, StoreConfig};
pub use detect::{
    detect_subscriptions, detect_subscriptions_with_config, detect_subscriptions_with_report,
    DetectionConfig, DetectionReport,
};
pub use error::{Error, Result};
pub use models::{
    AmountType, BillingFrequency, ConfidenceBreakdown, ConfidenceLevel, DetectedSubscription,
    RecurringType, Subscription, Transaction,
};
pub use normalize::{normalize, normalize_with_trace, NormalizedName};
pub use store::{load_subscriptions, save_subscriptions, JsonFileStore, SubscriptionStore};
#[cfg(any(test, feature = "test-utils"))]
pub use store::MemoryStore;
pub use subscriptions::{
    confirm, create_subscription, create_subscription_at, find_subscription,
    find_subscription_mut, remove_subscription, Confirmation,
};
