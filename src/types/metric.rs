//! Route quality metrics

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    TotalWeightedServices,
    TotalWorkingHours,
    AverageTimeBetweenServices,
    AverageMilesBetweenServices,
    AverageWeightedServicesPerHour,
}

impl MetricKey {
    pub const ALL: [MetricKey; 5] = [
        MetricKey::TotalWeightedServices,
        MetricKey::TotalWorkingHours,
        MetricKey::AverageTimeBetweenServices,
        MetricKey::AverageMilesBetweenServices,
        MetricKey::AverageWeightedServicesPerHour,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKey::TotalWeightedServices => "total_weighted_services",
            MetricKey::TotalWorkingHours => "total_working_hours",
            MetricKey::AverageTimeBetweenServices => "average_time_between_services",
            MetricKey::AverageMilesBetweenServices => "average_miles_between_services",
            MetricKey::AverageWeightedServicesPerHour => "average_weighted_services_per_hour",
        }
    }
}

/// Weighted quality measure of one route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: MetricKey,
    pub value: f64,
    /// Share of the route score this metric may contribute, in `0..=1`
    pub weight: f64,
    /// `weight` scaled by how close `value` is to the metric's optimum
    pub score: f64,
}

impl Metric {
    pub fn new(key: MetricKey, value: f64, weight: f64, normalized: f64) -> Self {
        Self {
            key,
            value,
            weight,
            score: weight * normalized.clamp(0.0, 1.0),
        }
    }
}
