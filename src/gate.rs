//! Feature gate: run one of two handlers depending on feature access.
//!
//! Keeps "is this feature allowed" separate from "what happens when it
//! isn't", so menu actions and screen entry points can share one policy.

use std::fmt;

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Blocked,
}

/// Handlers for the two gate branches. Both default to no-ops.
#[derive(Default)]
pub struct GateCallbacks<'a> {
    on_allowed: Option<Box<dyn FnOnce() + 'a>>,
    on_blocked: Option<Box<dyn FnOnce(&str) + 'a>>,
}

impl<'a> GateCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` when the feature is available.
    pub fn on_allowed(mut self, f: impl FnOnce() + 'a) -> Self {
        self.on_allowed = Some(Box::new(f));
        self
    }

    /// Run `f` with the feature id when the feature is blocked.
    pub fn on_blocked(mut self, f: impl FnOnce(&str) + 'a) -> Self {
        self.on_blocked = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for GateCallbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateCallbacks")
            .field("on_allowed", &self.on_allowed.is_some())
            .field("on_blocked", &self.on_blocked.is_some())
            .finish()
    }
}

pub fn evaluate(feature_id: &str, has_feature: impl Fn(&str) -> bool) -> GateDecision {
    if has_feature(feature_id) {
        GateDecision::Allowed
    } else {
        GateDecision::Blocked
    }
}

/// Check `feature_id` with `has_feature` and run the matching handler, if any.
///
/// `has_feature` is normally [`EntitlementState::has_feature`](crate::EntitlementState::has_feature).
pub fn require_pro(
    feature_id: &str,
    has_feature: impl Fn(&str) -> bool,
    callbacks: GateCallbacks<'_>,
) {
    let decision = evaluate(feature_id, has_feature);
    tracing::debug!("Feature gate {}: {:?}", feature_id, decision);

    match decision {
        GateDecision::Allowed => {
            if let Some(on_allowed) = callbacks.on_allowed {
                on_allowed();
            }
        }
        GateDecision::Blocked => {
            if let Some(on_blocked) = callbacks.on_blocked {
                on_blocked(feature_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    use crate::entitlement::EntitlementState;
    use crate::features::{DARK_MODE, EXPORT_PDF};
    use crate::store::{KeyValueStore, MemoryStore};

    async fn state(pro: bool) -> EntitlementState {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = EntitlementState::new(store);
        state.load().await;
        state.set_pro_status(pro).await;
        state
    }

    /// Run the gate and return (allowed calls, blocked ids).
    fn run(feature_id: &str, state: &EntitlementState) -> (usize, Vec<String>) {
        let allowed = Cell::new(0);
        let blocked = RefCell::new(Vec::new());
        require_pro(
            feature_id,
            |id| state.has_feature(id),
            GateCallbacks::new()
                .on_allowed(|| allowed.set(allowed.get() + 1))
                .on_blocked(|id| blocked.borrow_mut().push(id.to_string())),
        );
        (allowed.get(), blocked.into_inner())
    }

    #[tokio::test]
    async fn test_free_feature_always_allowed() {
        for pro in [false, true] {
            let state = state(pro).await;
            assert_eq!(run(DARK_MODE, &state), (1, vec![]));
        }
    }

    #[tokio::test]
    async fn test_pro_feature_blocked_without_pro() {
        let state = state(false).await;
        assert_eq!(run(EXPORT_PDF, &state), (0, vec![EXPORT_PDF.to_string()]));
    }

    #[tokio::test]
    async fn test_pro_feature_allowed_with_pro() {
        let state = state(true).await;
        assert_eq!(run(EXPORT_PDF, &state), (1, vec![]));
    }

    #[test]
    fn test_no_callbacks_is_noop() {
        require_pro("anything", |_| false, GateCallbacks::default());
        require_pro("anything", |_| true, GateCallbacks::new());
    }

    #[test]
    fn test_missing_branch_handler_is_skipped() {
        let blocked = Cell::new(false);
        require_pro(
            "anything",
            |_| true,
            GateCallbacks::new().on_blocked(|_| blocked.set(true)),
        );
        assert!(!blocked.get());
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(evaluate("x", |_| true), GateDecision::Allowed);
        assert_eq!(evaluate("x", |id| id == "y"), GateDecision::Blocked);
    }
}
