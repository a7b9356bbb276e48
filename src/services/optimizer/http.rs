//! JSON-over-HTTP route-solving engine client

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::RouteOptimizer;
use crate::defaults::SOLVER_TIMEOUT_SECONDS;
use crate::services::rules::{GeneralOptimizationRule, OptimizationRule};
use crate::types::{OptimizationEngine, OptimizationState};

#[derive(Debug, Clone)]
pub struct HttpOptimizerConfig {
    /// Base URL of the engine (e.g., "http://localhost:3000")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    pub engine: OptimizationEngine,
}

impl HttpOptimizerConfig {
    pub fn new(base_url: impl Into<String>, engine: OptimizationEngine) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_seconds: SOLVER_TIMEOUT_SECONDS,
            engine,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OptimizeRequest<'a> {
    state: &'a OptimizationState,
    rules: Vec<&'static str>,
}

pub struct HttpRouteOptimizer {
    client: Client,
    config: HttpOptimizerConfig,
}

impl HttpRouteOptimizer {
    pub fn new(config: HttpOptimizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<OptimizationState> {
        let url = self.url(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Route optimization engine returned error {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse route optimization engine response")
    }
}

fn build_optimize_request<'a>(
    state: &'a OptimizationState,
    rules: &[Arc<dyn GeneralOptimizationRule>],
) -> OptimizeRequest<'a> {
    OptimizeRequest {
        state,
        rules: rules.iter().map(|r| r.id()).collect(),
    }
}

#[async_trait]
impl RouteOptimizer for HttpRouteOptimizer {
    fn engine(&self) -> OptimizationEngine {
        self.config.engine
    }

    async fn optimize(
        &self,
        state: &OptimizationState,
        rules: &[Arc<dyn GeneralOptimizationRule>],
    ) -> Result<OptimizationState> {
        debug!(
            "Sending {} routes and {} rules to {}",
            state.routes.len(),
            rules.len(),
            self.config.engine
        );
        self.post("optimize", &build_optimize_request(state, rules)).await
    }

    async fn plan(&self, state: &OptimizationState) -> Result<OptimizationState> {
        self.post("plan", state).await
    }
}
