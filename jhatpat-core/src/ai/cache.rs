//! On-disk cache of model replies.
//!
//! Layout: `{root}/{prompt_name}/{model}/{hash[0:2]}/{hash}.json`, where the
//! hash is the SHA-256 of the JSON-serialized request input. Changing a
//! prompt's text therefore misses the cache without any versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::types::{ChatResponse, TokenUsage};

/// A reply as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn into_response(self) -> ChatResponse {
        ChatResponse {
            content: self.content,
            usage: self.usage,
            cached: true,
        }
    }
}

/// Where one request's reply lives in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub prompt_name: String,
    pub model: String,
    pub input_hash: String,
}

impl CacheKey {
    /// Key a request by prompt, model and the JSON form of `input`.
    pub fn new<T: Serialize + ?Sized>(prompt_name: &str, model: &str, input: &T) -> Self {
        let input_json = serde_json::to_vec(input).unwrap_or_default();
        Self {
            prompt_name: prompt_name.to_string(),
            model: model.to_string(),
            input_hash: hex::encode(Sha256::digest(&input_json)),
        }
    }

    fn relative_path(&self) -> PathBuf {
        // "google/gemini-2.5-flash" -> "google--gemini-2.5-flash"
        let model_dir = self.model.replace('/', "--");
        let (shard, _) = self.input_hash.split_at(2);

        let file_name = format!("{}.json", self.input_hash);

        [
            self.prompt_name.as_str(),
            model_dir.as_str(),
            shard,
            file_name.as_str(),
        ]
        .into_iter()
        .collect()
    }
}

/// Disk cache of AI replies, shared by the server and the CLI.
pub struct AiCache {
    root: PathBuf,
}

impl AiCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    /// The stored reply for `key`. Unreadable entries count as missing.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.entry_path(key);
        let raw = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt cache entry");
                None
            }
        }
    }

    /// Store a reply, replacing any previous entry atomically.
    pub fn put(&self, key: &CacheKey, response: &ChatResponse, model: &str) -> std::io::Result<()> {
        let path = self.entry_path(key);
        let dir = path
            .parent()
            .ok_or_else(|| std::io::Error::new(ErrorKind::InvalidInput, "cache path has no parent"))?;
        fs::create_dir_all(dir)?;

        let entry = CacheEntry {
            content: response.content.clone(),
            usage: response.usage,
            model: model.to_string(),
            stored_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Drop the entry for `key`, if there is one.
    pub fn remove(&self, key: &CacheKey) -> std::io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Count cached responses, per prompt.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();

        let Ok(prompts) = fs::read_dir(&self.root) else {
            return stats;
        };

        for prompt_dir in prompts.filter_map(|e| e.ok()).map(|e| e.path()) {
            if !prompt_dir.is_dir() {
                continue;
            }
            let count = count_json_files(&prompt_dir);
            if count == 0 {
                continue;
            }
            let prompt_name = prompt_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            stats.cached_responses += count;
            stats.by_prompt.insert(prompt_name, count);
        }

        stats
    }

    /// Delete every cached response.
    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub cached_responses: usize,
    /// Prompt name to number of cached responses.
    pub by_prompt: BTreeMap<String, usize>,
}

fn count_json_files(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .map(|path| {
            if path.is_dir() {
                count_json_files(&path)
            } else if path.extension().is_some_and(|ext| ext == "json") {
                1
            } else {
                0
            }
        })
        .sum()
}
