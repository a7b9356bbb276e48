//! Business rules applied around the route-solving engine
//!
//! Rules run in registration order. Later rules may rely on what earlier
//! ones changed, so the lists are never reordered.

mod additional;
mod general;

pub use additional::UnlockUnassignedAppointments;
pub use general::{
    IncreaseRouteSpeed, LockFirstAppointment, LockNotifiedAppointments, MustConsiderRoadTraffic,
    ReduceRoadTrafficPenalty, LOCK_FIRST_APPOINTMENT_FEATURE, ROAD_TRAFFIC_FACTOR,
};

use std::sync::Arc;

use crate::services::feature_flags::FeatureFlagService;
use crate::types::{OptimizationState, RuleExecutionResult};

/// Identity shared by every rule
pub trait OptimizationRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Audit entry for a rule that took part in a run
    fn execution_result(&self) -> RuleExecutionResult {
        RuleExecutionResult {
            rule_id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            triggered: true,
            applied: true,
        }
    }
}

/// Rule that adjusts a single state before it is solved
pub trait GeneralOptimizationRule: OptimizationRule {
    fn process(&self, state: &mut OptimizationState);
}

/// Rule that compares an engine result with its source and adjusts the source
pub trait AdditionalOptimizationRule: OptimizationRule {
    fn process(&self, source: &mut OptimizationState, result: &mut OptimizationState);
}

/// Ordered rule lists used by the optimization service
#[derive(Clone, Default)]
pub struct BusinessRulesRegistry {
    pub general: Vec<Arc<dyn GeneralOptimizationRule>>,
    pub additional: Vec<Arc<dyn AdditionalOptimizationRule>>,
    pub plan: Vec<Arc<dyn GeneralOptimizationRule>>,
    /// Appended to the active rules on every retry
    pub speed_boosts: Vec<Arc<dyn GeneralOptimizationRule>>,
}

impl BusinessRulesRegistry {
    pub fn with_defaults(feature_flags: Arc<dyn FeatureFlagService>) -> Self {
        Self {
            general: vec![
                Arc::new(LockNotifiedAppointments),
                Arc::new(LockFirstAppointment::new(feature_flags)),
                Arc::new(MustConsiderRoadTraffic),
            ],
            additional: vec![Arc::new(UnlockUnassignedAppointments)],
            plan: vec![Arc::new(MustConsiderRoadTraffic)],
            speed_boosts: vec![Arc::new(IncreaseRouteSpeed), Arc::new(ReduceRoadTrafficPenalty)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::feature_flags::StaticFeatureFlags;

    #[test]
    fn test_default_registry_order() {
        let registry = BusinessRulesRegistry::with_defaults(Arc::new(StaticFeatureFlags::new()));

        let general: Vec<&str> = registry.general.iter().map(|r| r.id()).collect();
        assert_eq!(
            general,
            vec!["lock_notified_appointments", "lock_first_appointment", "must_consider_road_traffic"]
        );

        let boosts: Vec<&str> = registry.speed_boosts.iter().map(|r| r.id()).collect();
        assert_eq!(boosts, vec!["increase_route_speed", "reduce_road_traffic_penalty"]);

        assert_eq!(registry.additional.len(), 1);
        assert_eq!(registry.plan[0].id(), "must_consider_road_traffic");
    }

    #[test]
    fn test_execution_result_marks_rule_as_applied() {
        let result = MustConsiderRoadTraffic.execution_result();
        assert_eq!(result.rule_id, "must_consider_road_traffic");
        assert!(result.triggered && result.applied);
    }
}
