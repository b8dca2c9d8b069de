//! In-memory subscription store for tests

use std::sync::Mutex;

use super::SubscriptionStore;
use crate::error::{Error, Result};
use crate::models::Subscription;

/// Keeps the serialized list in memory.
///
/// Data goes through JSON like the file store does, so serialization
/// problems show up here too.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let json = serde_json::to_string(subscriptions)?;
        let mut data = self
            .data
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))?;
        *data = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Vec<Subscription>> {
        let data = self
            .data
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".to_string()))?;
        match data.as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::create_subscription;
    use crate::test_utils::detected;

    #[test]
    fn test_empty_until_saved() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_empty());

        let subs = vec![create_subscription(&detected("SPOTIFY", -59.0))];
        store.save(&subs).unwrap();
        assert_eq!(store.load().unwrap(), subs);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }
}
