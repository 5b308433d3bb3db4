//! Directory-backed storage medium.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{ContextId, StorageEvent, StorageMedium, EVENT_CHANNEL_CAPACITY};
use crate::error::StorageError;

/// Stores each key as `{dir}/{key}.json`.
///
/// Writes made through this medium are broadcast immediately. Changes made by
/// other processes are picked up by [`FileMedium::poll_once`], which
/// [`FileMedium::spawn_poller`] runs on an interval.
pub struct FileMedium {
    dir: PathBuf,
    state: Mutex<State>,
    events: broadcast::Sender<StorageEvent>,
}

#[derive(Default)]
struct State {
    /// Last content this process read or wrote, per key it has touched.
    known: HashMap<String, Option<String>>,
    sequence: u64,
}

impl FileMedium {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            dir: dir.into(),
            state: Mutex::new(State::default()),
            events,
        }
    }

    /// Get the default data directory: ~/.jhatpat/data
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".jhatpat").join("data"))
            .unwrap_or_else(|| PathBuf::from("data/storage"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn read_file(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compare every known key with its file and broadcast what changed.
    ///
    /// Returns the number of changes detected.
    pub fn poll_once(&self) -> usize {
        let keys: Vec<String> = self.lock().known.keys().cloned().collect();
        let mut changed = 0;

        for key in keys {
            let current = match self.read_file(&key) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to poll storage file");
                    continue;
                }
            };

            let event = {
                let mut state = self.lock();
                if state.known.get(&key) == Some(&current) {
                    continue;
                }
                state.known.insert(key.clone(), current.clone());
                state.sequence += 1;
                StorageEvent {
                    key: key.clone(),
                    new_value: current,
                    origin: ContextId::External,
                    sequence: state.sequence,
                }
            };

            tracing::debug!(key = %key, "Detected external storage change");
            let _ = self.events.send(event);
            changed += 1;
        }

        changed
    }

    /// Poll for external changes every `interval` until the task is aborted.
    pub fn spawn_poller(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let medium = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                medium.poll_once();
            }
        })
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let content = self.read_file(key)?;
        self.lock().known.insert(key.to_string(), content.clone());
        Ok(content)
    }

    fn set_item(&self, key: &str, value: &str, origin: ContextId) -> Result<u64, StorageError> {
        fs::create_dir_all(&self.dir)?;

        // Sequence order must match the order writes land on disk.
        let mut state = self.lock();

        // Each write gets its own temp file, renamed over the target, so a
        // concurrent writer or poller never sees a half-written file.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.item_path(key)).map_err(|e| e.error)?;

        state.known.insert(key.to_string(), Some(value.to_string()));
        state.sequence += 1;
        let sequence = state.sequence;
        drop(state);

        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            new_value: Some(value.to_string()),
            origin,
            sequence,
        });
        Ok(sequence)
    }

    fn remove_item(&self, key: &str, origin: ContextId) -> Result<u64, StorageError> {
        let mut state = self.lock();

        match fs::remove_file(self.item_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        state.known.insert(key.to_string(), None);
        state.sequence += 1;
        let sequence = state.sequence;
        drop(state);

        let _ = self.events.send(StorageEvent {
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
        self.lock().sequence
    }
}

/// Make a storage key safe to use as a file name.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(200)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize_key("jhatpatRecipes"), "jhatpatRecipes");
        assert_eq!(sanitize_key("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn test_round_trips_through_disk() {
        let temp_dir = TempDir::new().unwrap();
        let medium = FileMedium::new(temp_dir.path().join("nested"));
        let ctx = ContextId::next();

        assert_eq!(medium.get_item("k").unwrap(), None);
        medium.set_item("k", "[1,2]", ctx).unwrap();
        assert_eq!(medium.get_item("k").unwrap().as_deref(), Some("[1,2]"));

        // A second medium on the same directory sees the data.
        let other = FileMedium::new(temp_dir.path().join("nested"));
        assert_eq!(other.get_item("k").unwrap().as_deref(), Some("[1,2]"));

        medium.remove_item("k", ctx).unwrap();
        assert_eq!(other.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let medium = FileMedium::new(temp_dir.path());
        assert!(medium.remove_item("never", ContextId::next()).is_ok());
    }

    #[tokio::test]
    async fn test_poll_detects_changes_from_other_process() {
        let temp_dir = TempDir::new().unwrap();
        let ours = FileMedium::new(temp_dir.path());
        let theirs = FileMedium::new(temp_dir.path());

        ours.set_item("k", "1", ContextId::next()).unwrap();
        let mut rx = ours.subscribe();

        // Nothing changed yet.
        assert_eq!(ours.poll_once(), 0);

        theirs.set_item("k", "2", ContextId::next()).unwrap();
        assert_eq!(ours.poll_once(), 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.origin, ContextId::External);
        assert_eq!(event.new_value.as_deref(), Some("2"));

        // Already seen.
        assert_eq!(ours.poll_once(), 0);

        theirs.remove_item("k", ContextId::next()).unwrap();
        assert_eq!(ours.poll_once(), 1);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.new_value, None);
    }

    #[test]
    fn test_concurrent_writers_share_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let server = Arc::new(FileMedium::new(temp_dir.path()));
        let cli = Arc::new(FileMedium::new(temp_dir.path()));

        let handles: Vec<_> = [server, cli]
            .into_iter()
            .flat_map(|medium| (0..4).map(move |t| (Arc::clone(&medium), t)))
            .map(|(medium, t)| {
                std::thread::spawn(move || {
                    let ctx = ContextId::next();
                    for i in 0..50 {
                        medium
                            .set_item("history", &format!("[{}, {}]", t, i), ctx)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["history.json".to_string()]);

        let last = FileMedium::new(temp_dir.path()).get_item("history").unwrap();
        assert!(last.unwrap().ends_with(", 49]"));
    }

    #[test]
    fn test_sequence_follows_writes() {
        let temp_dir = TempDir::new().unwrap();
        let medium = FileMedium::new(temp_dir.path());
        assert_eq!(medium.last_sequence(), 0);
        let seq = medium.set_item("k", "1", ContextId::next()).unwrap();
        assert_eq!(medium.last_sequence(), seq);
    }
}
