//! Feature catalog: which features are free and which require Pro.
//!
//! Classification is total: anything not in [`FREE_FEATURES`] is Pro.
//! [`PRO_FEATURES`] only describes the Pro features the app currently ships;
//! an id missing from it is still Pro.

use serde::Serialize;

pub const DARK_MODE: &str = "dark_mode";
pub const BASIC_SEARCH: &str = "basic_search";
pub const REMINDERS: &str = "reminders";
pub const OFFLINE_MODE: &str = "offline_mode";

pub const EXPORT_PDF: &str = "export_pdf";
pub const CLOUD_SYNC: &str = "cloud_sync";
pub const CUSTOM_THEMES: &str = "custom_themes";
pub const ADVANCED_STATS: &str = "advanced_stats";
pub const UNLIMITED_ITEMS: &str = "unlimited_items";

/// Features available to every user.
pub const FREE_FEATURES: &[&str] = &[DARK_MODE, BASIC_SEARCH, REMINDERS, OFFLINE_MODE];

/// Access tier of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureTier {
    Free,
    Pro,
}

/// A known Pro feature with its paywall display name.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureInfo {
    pub id: &'static str,
    pub name: &'static str,
}

pub const PRO_FEATURES: &[FeatureInfo] = &[
    FeatureInfo {
        id: EXPORT_PDF,
        name: "PDF Export",
    },
    FeatureInfo {
        id: CLOUD_SYNC,
        name: "Cloud Sync",
    },
    FeatureInfo {
        id: CUSTOM_THEMES,
        name: "Custom Themes",
    },
    FeatureInfo {
        id: ADVANCED_STATS,
        name: "Advanced Statistics",
    },
    FeatureInfo {
        id: UNLIMITED_ITEMS,
        name: "Unlimited Items",
    },
];

pub fn is_free(feature_id: &str) -> bool {
    FREE_FEATURES.contains(&feature_id)
}

pub fn classify(feature_id: &str) -> FeatureTier {
    if is_free(feature_id) {
        FeatureTier::Free
    } else {
        FeatureTier::Pro
    }
}

/// Display name for a known Pro feature, e.g. to tailor a paywall message.
pub fn display_name(feature_id: &str) -> Option<&'static str> {
    PRO_FEATURES
        .iter()
        .find(|f| f.id == feature_id)
        .map(|f| f.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_features_classified_free() {
        for id in FREE_FEATURES {
            assert_eq!(classify(id), FeatureTier::Free, "{id}");
        }
    }

    #[test]
    fn test_everything_else_is_pro() {
        for info in PRO_FEATURES {
            assert_eq!(classify(info.id), FeatureTier::Pro);
        }
        assert_eq!(classify("not_a_real_feature"), FeatureTier::Pro);
        assert_eq!(classify(""), FeatureTier::Pro);
        assert_eq!(classify("DARK_MODE"), FeatureTier::Pro);
    }

    #[test]
    fn test_catalogs_are_disjoint() {
        assert!(PRO_FEATURES.iter().all(|f| !is_free(f.id)));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(EXPORT_PDF), Some("PDF Export"));
        assert_eq!(display_name(DARK_MODE), None);
    }
}
