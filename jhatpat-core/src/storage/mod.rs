//! Durable key/value storage with change notifications.
//!
//! A [`StorageMedium`] plays the part of a browser's local storage: string
//! keys, string (JSON) values, and an event for every write so that other
//! contexts sharing the medium can mirror the change. [`PersistentStore`]
//! binds one key to a typed, JSON-serializable value on top of a medium.

mod file;
mod keyed;
mod memory;

pub use file::FileMedium;
pub use keyed::{LoadPhase, PersistentStore};
pub use memory::MemoryMedium;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use crate::error::StorageError;

/// Capacity of the change-event channel of each medium.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Identifies the context (store instance, process) that made a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextId {
    Local(u64),
    /// Change detected on disk, made outside this process.
    External,
}

impl ContextId {
    /// Allocate a fresh local context id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ContextId::Local(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A write or removal observed on a medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
    pub origin: ContextId,
    /// Medium-wide, strictly increasing.
    pub sequence: u64,
}

/// Durable string key/value medium.
pub trait StorageMedium: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, returning the write's sequence number.
    fn set_item(&self, key: &str, value: &str, origin: ContextId) -> Result<u64, StorageError>;

    /// Remove `key`, returning the removal's sequence number.
    fn remove_item(&self, key: &str, origin: ContextId) -> Result<u64, StorageError>;

    /// Receive every subsequent write and removal.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;

    /// Sequence of the newest write or removal so far, 0 if none.
    fn last_sequence(&self) -> u64;
}
