//! Route-solving engines
//!
//! The engine itself is external. Each adapter sends an optimization state
//! out and returns the state it gets back.

mod http;
mod post_optimization;

pub use http::{HttpOptimizerConfig, HttpRouteOptimizer};
pub use post_optimization::{PostOptimizationHandler, ReportUnassignedAppointments};

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::services::rules::GeneralOptimizationRule;
use crate::types::{OptimizationEngine, OptimizationState};

/// Route-solving engine abstraction (HTTP, mock, etc.)
#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    /// Engine identifier this adapter answers for
    fn engine(&self) -> OptimizationEngine;

    /// Solve the state with the given rules active
    async fn optimize(
        &self,
        state: &OptimizationState,
        rules: &[Arc<dyn GeneralOptimizationRule>],
    ) -> Result<OptimizationState>;

    /// Build a plan without touching the external system
    async fn plan(&self, state: &OptimizationState) -> Result<OptimizationState>;
}

/// Registered engines keyed by identifier
#[derive(Clone, Default)]
pub struct RouteOptimizerFactory {
    optimizers: HashMap<OptimizationEngine, Arc<dyn RouteOptimizer>>,
}

impl RouteOptimizerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine, replacing any adapter for the same identifier
    pub fn register(mut self, optimizer: Arc<dyn RouteOptimizer>) -> Self {
        self.optimizers.insert(optimizer.engine(), optimizer);
        self
    }

    pub fn get(&self, engine: OptimizationEngine) -> Option<Arc<dyn RouteOptimizer>> {
        self.optimizers.get(&engine).cloned()
    }
}
