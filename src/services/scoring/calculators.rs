//! Metric calculators
//!
//! Every calculator turns route statistics into one weighted metric. The
//! normalised value is 1 at (or beyond) the calculator's optimum.

use serde::{Deserialize, Serialize};

use crate::types::{Metric, MetricKey, RouteStats};

/// Stateless producer of one route metric
pub trait MetricCalculator: Send + Sync {
    fn key(&self) -> MetricKey;

    fn calculate(&self, stats: &RouteStats) -> Metric;
}

/// Weight of each metric, normally adding up to 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricWeights {
    pub total_weighted_services: f64,
    pub total_working_hours: f64,
    pub average_time_between_services: f64,
    pub average_miles_between_services: f64,
    pub average_weighted_services_per_hour: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            total_weighted_services: 0.3,
            total_working_hours: 0.1,
            average_time_between_services: 0.2,
            average_miles_between_services: 0.2,
            average_weighted_services_per_hour: 0.2,
        }
    }
}

impl MetricWeights {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::TotalWeightedServices => self.total_weighted_services,
            MetricKey::TotalWorkingHours => self.total_working_hours,
            MetricKey::AverageTimeBetweenServices => self.average_time_between_services,
            MetricKey::AverageMilesBetweenServices => self.average_miles_between_services,
            MetricKey::AverageWeightedServicesPerHour => self.average_weighted_services_per_hour,
        }
    }

    pub fn set(&mut self, key: MetricKey, weight: f64) {
        match key {
            MetricKey::TotalWeightedServices => self.total_weighted_services = weight,
            MetricKey::TotalWorkingHours => self.total_working_hours = weight,
            MetricKey::AverageTimeBetweenServices => self.average_time_between_services = weight,
            MetricKey::AverageMilesBetweenServices => self.average_miles_between_services = weight,
            MetricKey::AverageWeightedServicesPerHour => {
                self.average_weighted_services_per_hour = weight
            }
        }
    }
}

fn higher_is_better(value: f64, optimum: f64) -> f64 {
    if optimum <= 0.0 {
        return 0.0;
    }
    value / optimum
}

/// Zero values mean nothing was measured and score nothing
fn lower_is_better(value: f64, optimum: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    if value <= optimum {
        return 1.0;
    }
    optimum / value
}

pub struct TotalWeightedServicesCalculator {
    weight: f64,
}

impl TotalWeightedServicesCalculator {
    pub const OPTIMUM: f64 = 18.0;

    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MetricCalculator for TotalWeightedServicesCalculator {
    fn key(&self) -> MetricKey {
        MetricKey::TotalWeightedServices
    }

    fn calculate(&self, stats: &RouteStats) -> Metric {
        let value = stats.total_weighted_services as f64;
        Metric::new(self.key(), value, self.weight, higher_is_better(value, Self::OPTIMUM))
    }
}

pub struct TotalWorkingHoursCalculator {
    weight: f64,
}

impl TotalWorkingHoursCalculator {
    pub const OPTIMUM: f64 = 8.5;

    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MetricCalculator for TotalWorkingHoursCalculator {
    fn key(&self) -> MetricKey {
        MetricKey::TotalWorkingHours
    }

    fn calculate(&self, stats: &RouteStats) -> Metric {
        let value = stats.total_working_time.total_hours();
        Metric::new(self.key(), value, self.weight, higher_is_better(value, Self::OPTIMUM))
    }
}

pub struct AverageTimeBetweenServicesCalculator {
    weight: f64,
}

impl AverageTimeBetweenServicesCalculator {
    /// Minutes
    pub const OPTIMUM: f64 = 12.0;

    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MetricCalculator for AverageTimeBetweenServicesCalculator {
    fn key(&self) -> MetricKey {
        MetricKey::AverageTimeBetweenServices
    }

    fn calculate(&self, stats: &RouteStats) -> Metric {
        let value = stats.average_drive_time_between_services.total_minutes() as f64;
        Metric::new(self.key(), value, self.weight, lower_is_better(value, Self::OPTIMUM))
    }
}

pub struct AverageMilesBetweenServicesCalculator {
    weight: f64,
}

impl AverageMilesBetweenServicesCalculator {
    pub const OPTIMUM: f64 = 5.0;

    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MetricCalculator for AverageMilesBetweenServicesCalculator {
    fn key(&self) -> MetricKey {
        MetricKey::AverageMilesBetweenServices
    }

    fn calculate(&self, stats: &RouteStats) -> Metric {
        let value = stats.average_drive_distance_between_services.miles();
        Metric::new(self.key(), value, self.weight, lower_is_better(value, Self::OPTIMUM))
    }
}

pub struct AverageWeightedServicesPerHourCalculator {
    weight: f64,
}

impl AverageWeightedServicesPerHourCalculator {
    pub const OPTIMUM: f64 = 2.0;

    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl MetricCalculator for AverageWeightedServicesPerHourCalculator {
    fn key(&self) -> MetricKey {
        MetricKey::AverageWeightedServicesPerHour
    }

    fn calculate(&self, stats: &RouteStats) -> Metric {
        let hours = stats.total_working_time.total_hours();
        let value = if hours > 0.0 {
            stats.total_weighted_services as f64 / hours
        } else {
            0.0
        };
        Metric::new(self.key(), value, self.weight, higher_is_better(value, Self::OPTIMUM))
    }
}

/// Calculators registered by default, in reporting order
pub fn default_calculators(weights: &MetricWeights) -> Vec<Box<dyn MetricCalculator>> {
    vec![
        Box::new(TotalWeightedServicesCalculator::new(weights.total_weighted_services)),
        Box::new(TotalWorkingHoursCalculator::new(weights.total_working_hours)),
        Box::new(AverageTimeBetweenServicesCalculator::new(weights.average_time_between_services)),
        Box::new(AverageMilesBetweenServicesCalculator::new(weights.average_miles_between_services)),
        Box::new(AverageWeightedServicesPerHourCalculator::new(
            weights.average_weighted_services_per_hour,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::statistics::test_support::sample_route;
    use crate::services::statistics::RouteStatisticsService;

    fn sample_stats() -> RouteStats {
        RouteStatisticsService::new().stats(&sample_route(1))
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = MetricWeights::default();
        let total: f64 = MetricKey::ALL.iter().map(|k| weights.get(*k)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_set_and_get() {
        let mut weights = MetricWeights::default();
        weights.set(MetricKey::TotalWorkingHours, 0.05);
        assert_eq!(weights.get(MetricKey::TotalWorkingHours), 0.05);
    }

    #[test]
    fn test_default_calculators_cover_every_key() {
        let calculators = default_calculators(&MetricWeights::default());
        let keys: Vec<MetricKey> = calculators.iter().map(|c| c.key()).collect();
        assert_eq!(keys, MetricKey::ALL.to_vec());
    }

    #[test]
    fn test_weighted_services_metric() {
        let metric = TotalWeightedServicesCalculator::new(0.3).calculate(&sample_stats());
        assert_eq!(metric.value, 3.0);
        assert!((metric.score - 0.3 * 3.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_lower_is_better_metrics() {
        let stats = sample_stats();

        // 15 minutes between services, optimum is 12
        let metric = AverageTimeBetweenServicesCalculator::new(0.2).calculate(&stats);
        assert_eq!(metric.value, 15.0);
        assert!((metric.score - 0.2 * 12.0 / 15.0).abs() < 1e-9);

        // 5 miles between services hits the optimum
        let metric = AverageMilesBetweenServicesCalculator::new(0.2).calculate(&stats);
        assert!((metric.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_route_scores_zero() {
        let stats = RouteStatisticsService::new()
            .stats(&crate::types::route::test_support::route(1));

        for calculator in default_calculators(&MetricWeights::default()) {
            assert_eq!(calculator.calculate(&stats).score, 0.0, "{:?}", calculator.key());
        }
    }

    #[test]
    fn test_services_per_hour_metric_is_capped_by_weight() {
        // 3 weighted services in 80 minutes = 2.25 per hour, above the optimum
        let metric = AverageWeightedServicesPerHourCalculator::new(0.2).calculate(&sample_stats());
        assert!((metric.value - 2.25).abs() < 1e-9);
        assert!((metric.score - 0.2).abs() < 1e-9);
    }
}
