//! Handlers run once an optimization result is final

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::types::OptimizationState;

#[async_trait]
pub trait PostOptimizationHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, result: &mut OptimizationState) -> Result<()>;
}

/// Reports appointments the engine could not place
pub struct ReportUnassignedAppointments;

#[async_trait]
impl PostOptimizationHandler for ReportUnassignedAppointments {
    fn name(&self) -> &str {
        "report_unassigned_appointments"
    }

    async fn handle(&self, result: &mut OptimizationState) -> Result<()> {
        if !result.has_unassigned_appointments() {
            info!("Optimization {} assigned every appointment", result.id);
            return Ok(());
        }

        for appointment in &result.unassigned_appointments {
            warn!(
                "Appointment {} (subscription {}) left unassigned in optimization {}",
                appointment.id, appointment.subscription_id, result.id
            );
        }
        Ok(())
    }
}
