//! Subscription persistence with pluggable stores
//!
//! # Architecture
//!
//! - `SubscriptionStore` trait defines the interface for storage backends
//! - `JsonFileStore` keeps the full list in one JSON file
//! - `MemoryStore` is an in-memory test double (`test-utils` feature)
//!
//! The detection engine never touches a store. Callers load, edit and save
//! the whole list; `save_subscriptions`/`load_subscriptions` log failures
//! instead of returning them so a broken store never aborts a detection run.

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Subscription;

mod json_file;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use json_file::JsonFileStore;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

/// Trait for subscription storage backends
pub trait SubscriptionStore: Send + Sync {
    /// Human-readable name for this store
    fn name(&self) -> &str;

    /// Replace the stored list
    fn save(&self, subscriptions: &[Subscription]) -> Result<()>;

    /// Read the stored list (empty if nothing was saved yet)
    fn load(&self) -> Result<Vec<Subscription>>;
}

/// Save, logging any failure
pub fn save_subscriptions(store: &dyn SubscriptionStore, subscriptions: &[Subscription]) {
    match store.save(subscriptions) {
        Ok(()) => debug!(
            "Saved {} subscriptions to {}",
            subscriptions.len(),
            store.name()
        ),
        Err(e) => warn!("Failed to save subscriptions to {}: {}", store.name(), e),
    }
}

/// Load, falling back to an empty list on failure
pub fn load_subscriptions(store: &dyn SubscriptionStore) -> Vec<Subscription> {
    match store.load() {
        Ok(subscriptions) => {
            debug!(
                "Loaded {} subscriptions from {}",
                subscriptions.len(),
                store.name()
            );
            subscriptions
        }
        Err(e) => {
            warn!("Failed to load subscriptions from {}: {}", store.name(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::subscriptions::create_subscription;
    use crate::test_utils::detected;

    struct BrokenStore;

    impl SubscriptionStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        fn save(&self, _subscriptions: &[Subscription]) -> Result<()> {
            Err(Error::Store("disk on fire".to_string()))
        }

        fn load(&self) -> Result<Vec<Subscription>> {
            Err(Error::Store("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_failures_are_swallowed() {
        let subs = vec![create_subscription(&detected("SPOTIFY", -59.0))];
        save_subscriptions(&BrokenStore, &subs);
        assert!(load_subscriptions(&BrokenStore).is_empty());
    }

    #[test]
    fn test_round_trip_through_trait_object() {
        let store = MemoryStore::new();
        let subs = vec![
            create_subscription(&detected("SPOTIFY", -59.0)),
            create_subscription(&detected("NETFLIX COM", -149.0)),
        ];

        save_subscriptions(&store, &subs);
        assert_eq!(load_subscriptions(&store), subs);
    }
}
