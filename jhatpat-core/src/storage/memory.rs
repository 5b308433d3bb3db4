//! In-process storage medium.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use super::{ContextId, StorageEvent, StorageMedium, EVENT_CHANNEL_CAPACITY};
use crate::error::StorageError;

/// In-memory medium shared by any number of stores.
///
/// Stores sharing one `MemoryMedium` behave like browser tabs sharing one
/// origin's local storage. An optional quota caps the size of a single value.
pub struct MemoryMedium {
    inner: Mutex<Inner>,
    events: broadcast::Sender<StorageEvent>,
    quota_bytes: Option<usize>,
}

#[derive(Default)]
struct Inner {
    items: HashMap<String, String>,
    sequence: u64,
}

impl MemoryMedium {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(Inner::default()),
            events,
            quota_bytes: None,
        }
    }

    /// Reject values larger than `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn publish(&self, event: StorageEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str, origin: ContextId) -> Result<u64, StorageError> {
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    size: value.len(),
                    quota,
                });
            }
        }

        let sequence = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.sequence += 1;
            inner.items.insert(key.to_string(), value.to_string());
            inner.sequence
        };

        self.publish(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
            origin,
            sequence,
        });
        Ok(sequence)
    }

    fn remove_item(&self, key: &str, origin: ContextId) -> Result<u64, StorageError> {
        let sequence = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.sequence += 1;
            inner.items.remove(key);
            inner.sequence
        };

        self.publish(StorageEvent {
            key: key.to_string(),
            new_value: None,
            origin,
            sequence,
        });
        Ok(sequence)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    fn last_sequence(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let medium = MemoryMedium::new();
        let ctx = ContextId::next();
        medium.set_item("k", "\"v\"", ctx).unwrap();
        assert_eq!(medium.get_item("k").unwrap().as_deref(), Some("\"v\""));
        assert_eq!(medium.get_item("missing").unwrap(), None);
    }

    #[test]
    fn test_sequences_increase() {
        let medium = MemoryMedium::new();
        let ctx = ContextId::next();
        let a = medium.set_item("k", "1", ctx).unwrap();
        let b = medium.remove_item("k", ctx).unwrap();
        let c = medium.set_item("other", "2", ctx).unwrap();
        assert!(a < b && b < c);
        assert_eq!(medium.last_sequence(), c);
    }

    #[test]
    fn test_quota_rejects_large_values() {
        let medium = MemoryMedium::new().with_quota(4);
        let err = medium
            .set_item("k", "too long", ContextId::next())
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 8, quota: 4 }));
        assert_eq!(medium.get_item("k").unwrap(), None);
    }

    #[tokio::test]
    async fn test_writes_are_broadcast() {
        let medium = MemoryMedium::new();
        let mut rx = medium.subscribe();
        let ctx = ContextId::next();

        medium.set_item("k", "1", ctx).unwrap();
        medium.remove_item("k", ctx).unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.new_value.as_deref(), Some("1"));
        assert_eq!(first.origin, ctx);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.new_value, None);
    }
}
