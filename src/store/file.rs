//! JSON-file key-value store.
//!
//! All keys live in a single JSON object. Every write goes to a uniquely
//! named sibling temp file which is then renamed over the target, so a crash
//! mid-write leaves the previous contents intact.
//!
//! Writes through one `FileStore` are serialized. Separate instances on the
//! same path never tear the file, but their read-merge-write cycles can race
//! and drop each other's keys; share one instance per path.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::{EntitlementError, Result};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// What the store file currently holds.
enum Contents {
    Map(BTreeMap<String, String>),
    /// Readable text that is not a JSON string map.
    Unparseable(String),
}

pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// I/O failures are errors; bad JSON is reported as [`Contents::Unparseable`].
    async fn read_contents(&self) -> Result<Contents> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Contents::Map(BTreeMap::new())),
            Ok(content) => Ok(match serde_json::from_str(&content) {
                Ok(map) => Contents::Map(map),
                Err(e) => Contents::Unparseable(e.to_string()),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Contents::Map(BTreeMap::new())),
            Err(e) => Err(EntitlementError::StoreRead(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".into());
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path
            .with_file_name(format!("{}.{}.{}.tmp", name, std::process::id(), n))
    }

    async fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(map)?;

        let tmp = self.tmp_path();
        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(json.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.read_contents().await? {
            Contents::Map(mut map) => Ok(map.remove(key)),
            Contents::Unparseable(e) => Err(EntitlementError::StoreRead(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut map = match self.read_contents().await {
            Ok(Contents::Map(map)) => map,
            Ok(Contents::Unparseable(e)) => {
                tracing::warn!(
                    "Discarding unparseable store contents in {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
            // The file may be intact; rewriting it now would drop every other key.
            Err(e) => return Err(EntitlementError::StoreWrite(e.to_string())),
        };
        map.insert(key.to_string(), value.to_string());

        self.write_map(&map).await.map_err(|e| match e {
            EntitlementError::StoreWrite(_) => e,
            other => EntitlementError::StoreWrite(format!("{}: {}", self.path.display(), other)),
        })?;
        tracing::debug!("Stored key {} in {}", key, self.path.display());
        Ok(())
    }
}
