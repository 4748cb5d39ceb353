//! Pro entitlement state backed by a durable key-value store.
//!
//! The state starts as "not Pro, still loading". [`EntitlementState::load`]
//! reads the persisted record once per session; until it finishes,
//! `has_feature` answers with the conservative default and `is_loading()`
//! signals that the answer is not yet authoritative.
//!
//! Store and parse failures never reach the caller. A failed read is
//! fail-closed (not Pro); a failed write leaves the observable state alone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::{EntitlementConfig, DEFAULT_STORAGE_KEY};
use crate::error::Result;
use crate::features;
use crate::store::{FileStore, KeyValueStore};

/// Persisted entitlement record, stored as JSON under the storage key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementRecord {
    #[serde(rename = "isPro", default)]
    pub is_pro: bool,
}

/// Observable entitlement values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitlementSnapshot {
    pub is_pro: bool,
    pub is_loading: bool,
}

impl Default for EntitlementSnapshot {
    fn default() -> Self {
        Self {
            is_pro: false,
            is_loading: true,
        }
    }
}

/// Result of reading the record from the store.
#[derive(Debug)]
enum RecordLoad {
    /// Never written.
    Missing,
    Found(EntitlementRecord),
    /// Read failed or the stored text is not a valid record.
    Corrupt(String),
}

fn decode_record(raw: Result<Option<String>>) -> RecordLoad {
    match raw {
        Ok(None) => RecordLoad::Missing,
        // Only a JSON object is a record; serde's derive would also accept `[true]`.
        Ok(Some(text)) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value @ serde_json::Value::Object(_)) => {
                match serde_json::from_value::<EntitlementRecord>(value) {
                    Ok(record) => RecordLoad::Found(record),
                    Err(e) => RecordLoad::Corrupt(format!("invalid record: {}", e)),
                }
            }
            Ok(other) => RecordLoad::Corrupt(format!("record is not an object: {}", other)),
            Err(e) => RecordLoad::Corrupt(format!("unparseable record: {}", e)),
        },
        Err(e) => RecordLoad::Corrupt(e.to_string()),
    }
}

/// Single source of truth for Pro access in the current session.
///
/// Construct once and share by `Arc`.
pub struct EntitlementState {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    state: watch::Sender<EntitlementSnapshot>,
}

impl EntitlementState {
    /// Create state backed by `store`, using the default storage key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_storage_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_storage_key(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(EntitlementSnapshot::default());
        Self {
            store,
            storage_key: storage_key.into(),
            state,
        }
    }

    /// Create file-backed state from configuration.
    pub fn from_config(config: &EntitlementConfig) -> Self {
        tracing::info!("Entitlement store: {}", config.store_path.display());
        Self::with_storage_key(
            Arc::new(FileStore::new(&config.store_path)),
            config.storage_key.clone(),
        )
    }

    /// Read the persisted record and publish it.
    ///
    /// Always completes with `is_loading == false`.
    pub async fn load(&self) {
        let raw = self.store.get_item(&self.storage_key).await;

        match decode_record(raw) {
            RecordLoad::Found(record) => {
                tracing::info!("Entitlement loaded: pro={}", record.is_pro);
                self.state.send_modify(|s| {
                    s.is_pro = record.is_pro;
                    s.is_loading = false;
                });
            }
            RecordLoad::Missing => {
                tracing::info!("No entitlement record found, keeping pro={}", self.is_pro());
                self.state.send_modify(|s| s.is_loading = false);
            }
            RecordLoad::Corrupt(reason) => {
                tracing::warn!("Failed to load entitlement: {}, treating as not pro", reason);
                self.state.send_modify(|s| {
                    s.is_pro = false;
                    s.is_loading = false;
                });
            }
        }
    }

    /// Persist `status` and publish it once the write succeeds.
    ///
    /// Write failures are logged and leave the observable state unchanged.
    pub async fn set_pro_status(&self, status: bool) {
        if let Err(e) = self.try_set_pro_status(status).await {
            tracing::error!("Failed to save pro status {}: {}", status, e);
        }
    }

    /// Like [`set_pro_status`](Self::set_pro_status), but returns the store error.
    pub async fn try_set_pro_status(&self, status: bool) -> Result<()> {
        let record = EntitlementRecord { is_pro: status };
        let json = serde_json::to_string(&record)?;
        self.store.set_item(&self.storage_key, &json).await?;

        self.state.send_modify(|s| s.is_pro = status);
        tracing::info!("Pro status saved: {}", status);
        Ok(())
    }

    /// Whether `feature_id` is usable right now. Free features always are.
    pub fn has_feature(&self, feature_id: &str) -> bool {
        features::is_free(feature_id) || self.is_pro()
    }

    pub fn is_pro(&self) -> bool {
        self.state.borrow().is_pro
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn snapshot(&self) -> EntitlementSnapshot {
        *self.state.borrow()
    }

    /// Receive every change to the snapshot.
    pub fn subscribe(&self) -> watch::Receiver<EntitlementSnapshot> {
        self.state.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
