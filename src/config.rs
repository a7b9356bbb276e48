//! Configuration management

use anyhow::{Context, Result};

use crate::defaults::{CLUSTER_MAX_DISTANCE_MILES, SOLVER_TIMEOUT_SECONDS};
use crate::services::scoring::MetricWeights;
use crate::types::MetricKey;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Route-solving engine URL (optional, optimize needs it)
    pub solver_url: Option<String>,

    /// Engine request timeout
    pub solver_timeout_seconds: u64,

    /// Metric weights used for scoring. Not validated here, scoring rejects
    /// totals above 1.
    pub metric_weights: MetricWeights,

    /// Clustering admission radius
    pub cluster_max_distance_miles: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let solver_url = var("SOLVER_URL").filter(|url| !url.trim().is_empty());

        let solver_timeout_seconds = match var("SOLVER_TIMEOUT_SECONDS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("SOLVER_TIMEOUT_SECONDS is not a number: {}", value))?,
            None => SOLVER_TIMEOUT_SECONDS,
        };

        let mut metric_weights = MetricWeights::default();
        for key in MetricKey::ALL {
            let name = weight_variable(key);
            if let Some(value) = var(&name) {
                let weight: f64 = value
                    .parse()
                    .with_context(|| format!("{} is not a number: {}", name, value))?;
                if !(0.0..=1.0).contains(&weight) {
                    anyhow::bail!("{} must be between 0 and 1 (current: {})", name, weight);
                }
                metric_weights.set(key, weight);
            }
        }

        let cluster_max_distance_miles = match var("CLUSTER_MAX_DISTANCE_MILES") {
            Some(value) => value
                .parse()
                .with_context(|| format!("CLUSTER_MAX_DISTANCE_MILES is not a number: {}", value))?,
            None => CLUSTER_MAX_DISTANCE_MILES,
        };

        Ok(Self {
            solver_url,
            solver_timeout_seconds,
            metric_weights,
            cluster_max_distance_miles,
        })
    }
}

/// `METRIC_WEIGHT_TOTAL_WORKING_HOURS` and so on
fn weight_variable(key: MetricKey) -> String {
    format!("METRIC_WEIGHT_{}", key.as_str().to_uppercase())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.solver_url.is_none());
        assert_eq!(config.solver_timeout_seconds, SOLVER_TIMEOUT_SECONDS);
        assert_eq!(config.metric_weights, MetricWeights::default());
        assert_eq!(config.cluster_max_distance_miles, CLUSTER_MAX_DISTANCE_MILES);
    }

    #[test]
    fn test_config_solver_url_some_when_set() {
        let config = config_from(&[("SOLVER_URL", "http://localhost:3000")]).unwrap();
        assert_eq!(config.solver_url, Some("http://localhost:3000".to_string()));

        let config = config_from(&[("SOLVER_URL", " ")]).unwrap();
        assert!(config.solver_url.is_none());
    }

    #[test]
    fn test_config_metric_weight_override() {
        let config = config_from(&[("METRIC_WEIGHT_TOTAL_WORKING_HOURS", "0.05")]).unwrap();
        assert_eq!(config.metric_weights.total_working_hours, 0.05);
        assert_eq!(config.metric_weights.total_weighted_services, 0.3);
    }

    #[test]
    fn test_config_weights_over_one_in_total_are_loaded() {
        let config = config_from(&[("METRIC_WEIGHT_TOTAL_WEIGHTED_SERVICES", "0.9")]).unwrap();
        assert_eq!(config.metric_weights.total_weighted_services, 0.9);
    }

    #[test]
    fn test_config_rejects_invalid_numbers() {
        assert!(config_from(&[("SOLVER_TIMEOUT_SECONDS", "soon")]).is_err());
        assert!(config_from(&[("METRIC_WEIGHT_TOTAL_WORKING_HOURS", "1.5")]).is_err());
        assert!(config_from(&[("CLUSTER_MAX_DISTANCE_MILES", "far")]).is_err());
    }
}
