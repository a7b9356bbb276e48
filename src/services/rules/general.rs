//! Rules that prepare a state for the engine

use std::sync::Arc;

use tracing::debug;

use super::{GeneralOptimizationRule, OptimizationRule};
use crate::services::feature_flags::FeatureFlagService;
use crate::types::OptimizationState;

pub const LOCK_FIRST_APPOINTMENT_FEATURE: &str = "lock_first_appointment";

/// Travel duration multiplier used when traffic must be considered
pub const ROAD_TRAFFIC_FACTOR: f64 = 1.1;

const SPEED_BOOST: f64 = 1.1;

/// Appointments the customer already knows about stay where they are
pub struct LockNotifiedAppointments;

impl OptimizationRule for LockNotifiedAppointments {
    fn id(&self) -> &'static str {
        "lock_notified_appointments"
    }

    fn name(&self) -> &'static str {
        "Lock notified appointments"
    }

    fn description(&self) -> &'static str {
        "Appointments the customer was notified about keep their route and time"
    }
}

impl GeneralOptimizationRule for LockNotifiedAppointments {
    fn process(&self, state: &mut OptimizationState) {
        let mut locked = 0;
        for appointment in state.routes.iter_mut().flat_map(|r| r.appointments_mut()) {
            if appointment.is_notified && !appointment.is_locked {
                appointment.is_locked = true;
                locked += 1;
            }
        }
        debug!("Locked {} notified appointments", locked);
    }
}

pub struct LockFirstAppointment {
    feature_flags: Arc<dyn FeatureFlagService>,
}

impl LockFirstAppointment {
    pub fn new(feature_flags: Arc<dyn FeatureFlagService>) -> Self {
        Self { feature_flags }
    }
}

impl OptimizationRule for LockFirstAppointment {
    fn id(&self) -> &'static str {
        "lock_first_appointment"
    }

    fn name(&self) -> &'static str {
        "Lock first appointment"
    }

    fn description(&self) -> &'static str {
        "The first appointment of every route keeps its position"
    }
}

impl GeneralOptimizationRule for LockFirstAppointment {
    fn process(&self, state: &mut OptimizationState) {
        if !self
            .feature_flags
            .is_feature_enabled_for_office(state.office.id, LOCK_FIRST_APPOINTMENT_FEATURE)
        {
            return;
        }

        for route in &mut state.routes {
            if let Some(first) = route.appointments_mut().next() {
                first.is_locked = true;
            }
        }
    }
}

pub struct MustConsiderRoadTraffic;

impl OptimizationRule for MustConsiderRoadTraffic {
    fn id(&self) -> &'static str {
        "must_consider_road_traffic"
    }

    fn name(&self) -> &'static str {
        "Must consider road traffic"
    }

    fn description(&self) -> &'static str {
        "Travel durations are extended to account for road traffic"
    }
}

impl GeneralOptimizationRule for MustConsiderRoadTraffic {
    fn process(&self, state: &mut OptimizationState) {
        state.engine_parameters.traffic_factor = ROAD_TRAFFIC_FACTOR;
    }
}

pub struct IncreaseRouteSpeed;

impl OptimizationRule for IncreaseRouteSpeed {
    fn id(&self) -> &'static str {
        "increase_route_speed"
    }

    fn name(&self) -> &'static str {
        "Increase route speed"
    }

    fn description(&self) -> &'static str {
        "Raises the assumed average travel speed so more services fit"
    }
}

impl GeneralOptimizationRule for IncreaseRouteSpeed {
    fn process(&self, state: &mut OptimizationState) {
        state.engine_parameters.average_speed_factor *= SPEED_BOOST;
    }
}

pub struct ReduceRoadTrafficPenalty;

impl OptimizationRule for ReduceRoadTrafficPenalty {
    fn id(&self) -> &'static str {
        "reduce_road_traffic_penalty"
    }

    fn name(&self) -> &'static str {
        "Reduce road traffic penalty"
    }

    fn description(&self) -> &'static str {
        "Halves the extra travel time added for road traffic"
    }
}

impl GeneralOptimizationRule for ReduceRoadTrafficPenalty {
    fn process(&self, state: &mut OptimizationState) {
        let factor = state.engine_parameters.traffic_factor;
        state.engine_parameters.traffic_factor = 1.0 + (factor - 1.0) / 2.0;
    }
}
