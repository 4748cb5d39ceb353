//! Entitlement configuration.
//!
//! Stored as JSON; every field falls back to its default when missing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Storage key the entitlement record is written under.
pub const DEFAULT_STORAGE_KEY: &str = "@app_pro_status";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementConfig {
    /// Key of the entitlement record inside the store.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// JSON file backing the store
    /// (default: `<data dir>/com.pro-entitlements.app/store.json`).
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

fn default_store_path() -> PathBuf {
    get_app_data_dir().join("store.json")
}

/// Get the app data directory.
pub fn get_app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("com.pro-entitlements.app")
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            store_path: default_store_path(),
        }
    }
}

impl EntitlementConfig {
    /// Load config from a JSON file. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to parse config file {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save config to a JSON file.
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EntitlementConfig::default();
        assert_eq!(config.storage_key, "@app_pro_status");
        assert!(config.store_path.ends_with("com.pro-entitlements.app/store.json"));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = std::env::temp_dir().join("pro_entitlements_test_config.json");
        let config = EntitlementConfig {
            storage_key: "custom_key".to_string(),
            store_path: PathBuf::from("/tmp/custom_store.json"),
        };
        config.save(&tmp).unwrap();

        let loaded = EntitlementConfig::load(&tmp);
        assert_eq!(loaded.storage_key, "custom_key");
        assert_eq!(loaded.store_path, PathBuf::from("/tmp/custom_store.json"));

        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let config: EntitlementConfig = serde_json::from_str(r#"{"storage_key":"k"}"#).unwrap();
        assert_eq!(config.storage_key, "k");
        assert_eq!(config.store_path, default_store_path());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let tmp = std::env::temp_dir().join("pro_entitlements_test_bad_config.json");
        std::fs::write(&tmp, r#"{"storage_key": 42}"#).unwrap();

        let config = EntitlementConfig::load(&tmp);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.store_path, default_store_path());

        let _ = std::fs::remove_file(&tmp);
    }

    #[test]
    fn test_load_missing_file() {
        let config = EntitlementConfig::load(&PathBuf::from("/nonexistent/config.json"));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }
}
