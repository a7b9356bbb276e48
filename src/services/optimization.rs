//! Optimization control loop
//!
//! General rules prepare the source state, the engine solves it, and while
//! appointments remain unassigned the loop loosens travel constraints and
//! tries again, up to [`MAX_OPTIMIZATION_ATTEMPTS`] engine calls in total.
//! Running out of attempts is accepted: the last result is scored as is.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::defaults::MAX_OPTIMIZATION_ATTEMPTS;
use crate::services::optimizer::{PostOptimizationHandler, RouteOptimizerFactory};
use crate::services::rules::{BusinessRulesRegistry, GeneralOptimizationRule, OptimizationRule};
use crate::services::scoring::{RouteOptimizationScoreCalculationService, ScoreError};
use crate::types::{OptimizationEngine, OptimizationState, OptimizationStatus, RuleExecutionResult};

#[derive(Debug, Error)]
pub enum OptimizationError {
    #[error("Unknown route optimization engine identifier: {0}")]
    UnknownRouteOptimizationEngineIdentifier(OptimizationEngine),

    #[error(transparent)]
    InvalidTotalWeightOfMetrics(#[from] ScoreError),

    #[error("Route optimization engine failed: {0:#}")]
    Engine(anyhow::Error),

    #[error("Post-optimization handler failed: {0:#}")]
    PostOptimization(anyhow::Error),
}

pub struct OptimizationService {
    engines: RouteOptimizerFactory,
    rules: BusinessRulesRegistry,
    post_handlers: Vec<Arc<dyn PostOptimizationHandler>>,
    scoring: RouteOptimizationScoreCalculationService,
}

impl OptimizationService {
    pub fn new(
        engines: RouteOptimizerFactory,
        rules: BusinessRulesRegistry,
        post_handlers: Vec<Arc<dyn PostOptimizationHandler>>,
        scoring: RouteOptimizationScoreCalculationService,
    ) -> Self {
        Self {
            engines,
            rules,
            post_handlers,
            scoring,
        }
    }

    /// Optimize `source` in place and return the engine's final result.
    ///
    /// The engine is resolved before any rule runs, so an unknown engine
    /// leaves `source` untouched.
    pub async fn optimize(
        &self,
        source: &mut OptimizationState,
    ) -> Result<OptimizationState, OptimizationError> {
        let engine = self.engines.get(source.engine).ok_or(
            OptimizationError::UnknownRouteOptimizationEngineIdentifier(source.engine),
        )?;

        let mut audit: Vec<RuleExecutionResult> = Vec::new();
        let mut active_rules: Vec<Arc<dyn GeneralOptimizationRule>> = Vec::new();

        for rule in &self.rules.general {
            rule.process(source);
            audit.push(rule.execution_result());
            active_rules.push(rule.clone());
        }

        info!(
            "Optimizing {} routes for office {} on {} with {}",
            source.routes.len(),
            source.office.id,
            source.date,
            source.engine
        );

        let mut result = engine
            .optimize(source, &active_rules)
            .await
            .map_err(OptimizationError::Engine)?;
        let mut attempts = 1;
        let mut retry_rules: HashSet<&'static str> = HashSet::new();

        while result.has_unassigned_appointments() && attempts < MAX_OPTIMIZATION_ATTEMPTS {
            debug!(
                "Attempt {} left {} appointments unassigned, retrying",
                attempts,
                result.unassigned_appointments.len()
            );

            for rule in &self.rules.additional {
                rule.process(source, &mut result);
                if retry_rules.insert(rule.id()) {
                    audit.push(rule.execution_result());
                }
            }

            for rule in &self.rules.speed_boosts {
                rule.process(source);
                if retry_rules.insert(rule.id()) {
                    audit.push(rule.execution_result());
                    active_rules.push(rule.clone());
                }
            }

            result = engine
                .optimize(source, &active_rules)
                .await
                .map_err(OptimizationError::Engine)?;
            attempts += 1;
        }

        if result.has_unassigned_appointments() {
            warn!(
                "Optimization {} finished after {} attempts with {} unassigned appointments",
                result.id,
                attempts,
                result.unassigned_appointments.len()
            );
        } else {
            info!("Optimization {} converged after {} attempts", result.id, attempts);
        }

        for handler in &self.post_handlers {
            debug!("Running post-optimization handler {}", handler.name());
            handler
                .handle(&mut result)
                .await
                .map_err(OptimizationError::PostOptimization)?;
        }

        self.scoring.calculate(&mut result)?;

        result.rule_execution_results = audit;
        result.status = OptimizationStatus::Post;

        Ok(result)
    }

    /// Plan a copy of `state`; any failure hands back `state` unchanged
    pub async fn plan(&self, state: OptimizationState) -> OptimizationState {
        let Some(engine) = self.engines.get(state.engine) else {
            warn!("No route optimization engine registered for {}, skipping plan", state.engine);
            return state;
        };

        let mut planned = state.clone();
        for rule in &self.rules.plan {
            rule.process(&mut planned);
        }

        match engine.plan(&planned).await {
            Ok(mut result) => {
                result.rule_execution_results =
                    self.rules.plan.iter().map(|r| r.execution_result()).collect();
                result.status = OptimizationStatus::Plan;
                result
            }
            Err(e) => {
                warn!("Planning for office {} failed: {:#}", state.office.id, e);
                state
            }
        }
    }
}
