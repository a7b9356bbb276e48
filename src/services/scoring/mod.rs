//! Route optimization score calculation

mod calculators;

pub use calculators::{
    default_calculators, AverageMilesBetweenServicesCalculator, AverageTimeBetweenServicesCalculator,
    AverageWeightedServicesPerHourCalculator, MetricCalculator, MetricWeights,
    TotalWeightedServicesCalculator, TotalWorkingHoursCalculator,
};

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::services::statistics::RouteStatisticsService;
use crate::types::{MetricKey, OptimizationState};

/// Float slack allowed when adding up weights
const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("invalid total weight of metrics: {total}, must not exceed 1")]
    InvalidTotalWeightOfMetrics { total: f64 },
}

pub struct RouteOptimizationScoreCalculationService {
    route_statistics: RouteStatisticsService,
    calculators: Vec<Box<dyn MetricCalculator>>,
}

impl RouteOptimizationScoreCalculationService {
    pub fn new(
        route_statistics: RouteStatisticsService,
        calculators: Vec<Box<dyn MetricCalculator>>,
    ) -> Self {
        Self {
            route_statistics,
            calculators,
        }
    }

    pub fn with_weights(weights: &MetricWeights) -> Self {
        Self::new(RouteStatisticsService::new(), default_calculators(weights))
    }

    /// Attach metrics to every route and record the averaged scores on the state
    pub fn calculate(&self, state: &mut OptimizationState) -> Result<(), ScoreError> {
        for route in &mut state.routes {
            let stats = self.route_statistics.stats(route);

            for calculator in &self.calculators {
                route.set_metric(calculator.calculate(&stats));
            }

            let total = route.total_metric_weight();
            if total > 1.0 + WEIGHT_TOLERANCE {
                return Err(ScoreError::InvalidTotalWeightOfMetrics { total });
            }

            debug!(
                "Route {} scored {:.3} over {} metrics",
                route.id,
                route.optimization_score(),
                route.metrics().len()
            );
        }

        let mut sums: BTreeMap<MetricKey, f64> = BTreeMap::new();
        for metric in state.routes.iter().flat_map(|r| r.metrics()) {
            *sums.entry(metric.key).or_default() += metric.score;
        }

        let routes = state.routes.len() as f64;
        state.weighted_metrics = sums
            .into_iter()
            .map(|(key, sum)| (key, sum / routes))
            .collect();
        state.optimization_score = if state.routes.is_empty() {
            None
        } else {
            Some(state.routes.iter().map(|r| r.optimization_score()).sum::<f64>() / routes)
        };

        Ok(())
    }
}
