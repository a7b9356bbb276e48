//! Per-office feature flags consulted by business rules

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

pub trait FeatureFlagService: Send + Sync {
    fn is_feature_enabled_for_office(&self, office_id: i64, feature: &str) -> bool;
}

/// In-memory flag store
#[derive(Default)]
pub struct StaticFeatureFlags {
    enabled: RwLock<HashMap<i64, HashSet<String>>>,
}

impl StaticFeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, office_id: i64, feature: impl Into<String>) {
        self.enabled
            .write()
            .entry(office_id)
            .or_default()
            .insert(feature.into());
    }

    pub fn disable(&self, office_id: i64, feature: &str) {
        if let Some(features) = self.enabled.write().get_mut(&office_id) {
            features.remove(feature);
        }
    }
}

impl FeatureFlagService for StaticFeatureFlags {
    fn is_feature_enabled_for_office(&self, office_id: i64, feature: &str) -> bool {
        self.enabled
            .read()
            .get(&office_id)
            .is_some_and(|features| features.contains(feature))
    }
}
