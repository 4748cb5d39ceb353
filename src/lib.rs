//! Pro entitlement flag and feature gating.
//!
//! ```no_run
//! use std::sync::Arc;
//! use pro_entitlements::{require_pro, EntitlementConfig, EntitlementState, GateCallbacks};
//!
//! # async fn demo() {
//! let state = Arc::new(EntitlementState::from_config(&EntitlementConfig::default()));
//! state.load().await;
//!
//! require_pro(
//!     "export_pdf",
//!     |id| state.has_feature(id),
//!     GateCallbacks::new()
//!         .on_allowed(|| println!("exporting"))
//!         .on_blocked(|id| println!("show paywall for {id}")),
//! );
//! # }
//! ```

pub mod config;
pub mod entitlement;
pub mod error;
pub mod features;
pub mod gate;
pub mod store;

pub use config::EntitlementConfig;
pub use entitlement::{EntitlementRecord, EntitlementSnapshot, EntitlementState};
pub use error::{EntitlementError, Result};
pub use features::FeatureTier;
pub use gate::{require_pro, GateCallbacks, GateDecision};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `pro_entitlements=info`. Safe to call
/// more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pro_entitlements=info")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }
}
