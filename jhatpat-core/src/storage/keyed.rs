//! A typed value bound to one key of a storage medium.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::{ContextId, StorageEvent, StorageMedium};

/// Whether the store has read its value from the medium yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
}

type Updater<T> = Box<dyn FnOnce(T) -> T + Send>;

/// A JSON value persisted under a single key.
///
/// Until [`load`](Self::load) runs, reads return the fallback and updates are
/// queued; they are replayed in order on top of the loaded value. Every
/// update serializes the whole value to the medium. Persistence failures are
/// logged and otherwise ignored: the in-memory value is always updated.
///
/// Cloning is cheap and every clone shares the same state.
pub struct PersistentStore<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    key: String,
    fallback: T,
    medium: Arc<dyn StorageMedium>,
    context: ContextId,
    state: Mutex<State<T>>,
    changes: watch::Sender<T>,
}

struct State<T> {
    value: T,
    phase: LoadPhase,
    pending: Vec<Updater<T>>,
    /// Bumped on every in-memory change.
    revision: u64,
    /// Sequence of the newest medium write reflected in `value`.
    last_sequence: u64,
}

impl<T> Clone for PersistentStore<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> PersistentStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a store for `key`. The store starts in [`LoadPhase::Loading`].
    pub fn new(medium: Arc<dyn StorageMedium>, key: impl Into<String>, fallback: T) -> Self {
        let (changes, _) = watch::channel(fallback.clone());
        Self {
            shared: Arc::new(Shared {
                key: key.into(),
                fallback: fallback.clone(),
                medium,
                context: ContextId::next(),
                state: Mutex::new(State {
                    value: fallback,
                    phase: LoadPhase::Loading,
                    pending: Vec::new(),
                    revision: 0,
                    last_sequence: 0,
                }),
                changes,
            }),
        }
    }

    /// Create a store and load it immediately.
    pub fn open(medium: Arc<dyn StorageMedium>, key: impl Into<String>, fallback: T) -> Self {
        let store = Self::new(medium, key, fallback);
        store.load();
        store
    }

    pub fn key(&self) -> &str {
        &self.shared.key
    }

    pub fn context(&self) -> ContextId {
        self.shared.context
    }

    pub fn phase(&self) -> LoadPhase {
        self.lock().phase
    }

    pub fn is_loaded(&self) -> bool {
        self.phase() == LoadPhase::Ready
    }

    /// Revision counter, bumped on every change of the in-memory value.
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Current value (the fallback while loading).
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().value)
    }

    /// Like [`with`](Self::with), also passing the revision of that value.
    pub fn with_revision<R>(&self, f: impl FnOnce(u64, &T) -> R) -> R {
        let state = self.lock();
        f(state.revision, &state.value)
    }

    /// Receive the value after every change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.changes.subscribe()
    }

    /// Read the value from the medium and replay queued updates.
    ///
    /// Missing or unreadable values fall back to the store's fallback.
    /// Calling this again once loaded does nothing.
    pub fn load(&self) {
        let mut state = self.lock();
        if state.phase == LoadPhase::Ready {
            return;
        }

        // Events up to here are already part of what we read.
        state.last_sequence = self.shared.medium.last_sequence();
        state.value = self.read_from_medium();
        state.phase = LoadPhase::Ready;

        let pending = std::mem::take(&mut state.pending);
        if !pending.is_empty() {
            tracing::debug!(
                key = %self.shared.key,
                count = pending.len(),
                "Replaying updates queued while loading"
            );
            let mut value = std::mem::replace(&mut state.value, self.shared.fallback.clone());
            for updater in pending {
                value = updater(value);
            }
            state.value = value;
            self.persist(&mut state);
        }

        self.commit(&mut state);
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Read-modify-write against the current in-memory value.
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(T) -> T + Send + 'static,
    {
        let mut state = self.lock();

        if state.phase == LoadPhase::Loading {
            tracing::debug!(key = %self.shared.key, "Store not loaded yet, queueing update");
            state.pending.push(Box::new(updater));
            return;
        }

        let current = std::mem::replace(&mut state.value, self.shared.fallback.clone());
        state.value = updater(current);
        self.persist(&mut state);
        self.commit(&mut state);
    }

    /// Mirror a change made by another context.
    ///
    /// Events for other keys, from this store's own context, or older than
    /// what this store already reflects are ignored. Returns whether the
    /// value changed.
    pub fn apply_storage_event(&self, event: &StorageEvent) -> bool {
        if event.key != self.shared.key || event.origin == self.shared.context {
            return false;
        }

        let mut state = self.lock();
        if state.phase == LoadPhase::Loading || event.sequence <= state.last_sequence {
            return false;
        }

        state.value = match &event.new_value {
            Some(raw) => self.parse_or_fallback(raw),
            None => self.shared.fallback.clone(),
        };
        state.last_sequence = event.sequence;
        self.commit(&mut state);
        true
    }

    /// Spawn a task that mirrors changes made by other contexts.
    ///
    /// The task ends when the medium's event channel closes; abort the handle
    /// to stop it earlier.
    pub fn watch_external_changes(&self) -> JoinHandle<()> {
        let mut events = self.shared.medium.subscribe();
        let store = self.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if store.apply_storage_event(&event) {
                            tracing::debug!(
                                key = %event.key,
                                sequence = event.sequence,
                                "Mirrored external storage change"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            key = %store.shared.key,
                            skipped,
                            "Missed storage events, reloading from medium"
                        );
                        store.resync();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Re-read the value from the medium unconditionally.
    fn resync(&self) {
        let mut state = self.lock();
        if state.phase == LoadPhase::Loading {
            return;
        }
        state.last_sequence = self.shared.medium.last_sequence();
        state.value = self.read_from_medium();
        self.commit(&mut state);
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_from_medium(&self) -> T {
        match self.shared.medium.get_item(&self.shared.key) {
            Ok(Some(raw)) => self.parse_or_fallback(&raw),
            Ok(None) => self.shared.fallback.clone(),
            Err(e) => {
                tracing::error!(key = %self.shared.key, error = %e, "Error reading stored value");
                self.shared.fallback.clone()
            }
        }
    }

    fn parse_or_fallback(&self, raw: &str) -> T {
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::error!(key = %self.shared.key, error = %e, "Error parsing stored value");
            self.shared.fallback.clone()
        })
    }

    /// Write the full value to the medium. Failures are logged only.
    fn persist(&self, state: &mut State<T>) {
        let result = serde_json::to_string(&state.value)
            .map_err(Into::into)
            .and_then(|json| {
                self.shared
                    .medium
                    .set_item(&self.shared.key, &json, self.shared.context)
            });

        match result {
            Ok(sequence) => state.last_sequence = sequence,
            Err(e) => {
                tracing::error!(key = %self.shared.key, error = %e, "Error persisting value");
            }
        }
    }

    fn commit(&self, state: &mut State<T>) {
        state.revision += 1;
        self.shared.changes.send_replace(state.value.clone());
    }
}
