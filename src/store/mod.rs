//! Durable key-value storage the entitlement state persists through.
//!
//! Two adapters ship with the crate:
//! 1. **Memory**: process-local map, for tests and throwaway sessions
//! 2. **File**: one JSON object on disk, replaced atomically on every write
//!
//! Anything else (platform keychains, shared preferences) plugs in by
//! implementing [`KeyValueStore`].

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Async string-keyed storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. `Ok(None)` if it was never written.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
}
