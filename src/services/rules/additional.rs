//! Rules applied between engine attempts

use std::collections::HashSet;

use tracing::debug;

use super::{AdditionalOptimizationRule, OptimizationRule};
use crate::types::OptimizationState;

/// Locked appointments the engine could not place are released for the next attempt
pub struct UnlockUnassignedAppointments;

impl OptimizationRule for UnlockUnassignedAppointments {
    fn id(&self) -> &'static str {
        "unlock_unassigned_appointments"
    }

    fn name(&self) -> &'static str {
        "Unlock unassigned appointments"
    }

    fn description(&self) -> &'static str {
        "Locked appointments left unassigned by the engine may be moved on the next attempt"
    }
}

impl AdditionalOptimizationRule for UnlockUnassignedAppointments {
    fn process(&self, source: &mut OptimizationState, result: &mut OptimizationState) {
        let unassigned: HashSet<i64> = result
            .unassigned_appointments
            .iter()
            .filter(|a| a.is_locked)
            .map(|a| a.id)
            .collect();

        if unassigned.is_empty() {
            return;
        }

        let source_appointments = source
            .routes
            .iter_mut()
            .flat_map(|r| r.appointments_mut())
            .chain(source.unassigned_appointments.iter_mut());

        let mut unlocked = 0;
        for appointment in source_appointments {
            if appointment.is_locked && unassigned.contains(&appointment.id) {
                appointment.is_locked = false;
                unlocked += 1;
            }
        }

        for appointment in &mut result.unassigned_appointments {
            appointment.is_locked = false;
        }

        debug!("Unlocked {} appointments left unassigned", unlocked);
    }
}
