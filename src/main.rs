//! Fleet Route Optimizer - route scoring, optimization and scheduling CLI
//!
//! Reads optimization or scheduling states as JSON and runs the matching
//! service over them.

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_route_optimizer::config::Config;
use fleet_route_optimizer::services::feature_flags::StaticFeatureFlags;
use fleet_route_optimizer::services::optimization::OptimizationService;
use fleet_route_optimizer::services::optimizer::{
    HttpOptimizerConfig, HttpRouteOptimizer, ReportUnassignedAppointments, RouteOptimizerFactory,
};
use fleet_route_optimizer::services::rules::BusinessRulesRegistry;
use fleet_route_optimizer::services::scheduling::SchedulingService;
use fleet_route_optimizer::services::scoring::RouteOptimizationScoreCalculationService;
use fleet_route_optimizer::services::statistics::{
    OptimizationStateStatisticsService, RouteStatisticsService,
};
use fleet_route_optimizer::types::{OptimizationEngine, OptimizationState, SchedulingState};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ../logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "optimizer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Both stderr and file, stdout carries command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,fleet_route_optimizer=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let result = match cli.command {
        Command::Score { input, csv } => score(&config, &input, csv.as_deref()),
        Command::Optimize { input, output } => optimize(&config, &input, output.as_deref()).await,
        Command::Schedule { input } => schedule(&config, &input),
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn score(config: &Config, input: &Path, csv_path: Option<&Path>) -> Result<()> {
    let mut state: OptimizationState = read_json(input)?;

    RouteOptimizationScoreCalculationService::with_weights(&config.metric_weights)
        .calculate(&mut state)?;

    let stats = OptimizationStateStatisticsService::default().stats(&state);
    info!(
        "Scored {} routes of optimization {}",
        state.routes.len(),
        state.id
    );

    if let Some(path) = csv_path {
        write_route_stats_csv(&state, path)?;
        info!("Route statistics written to {}", path.display());
    }

    let output = json!({
        "stats": stats.to_map(),
        "optimizationScore": state.optimization_score,
        "weightedMetrics": state.weighted_metrics,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn write_route_stats_csv(state: &OptimizationState, path: &Path) -> Result<()> {
    let route_statistics = RouteStatisticsService::new();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for (index, route) in state.routes.iter().enumerate() {
        let stats = route_statistics.stats(route).to_map();

        if index == 0 {
            let mut header = vec!["route_id".to_string()];
            header.extend(stats.keys().cloned());
            header.push("optimization_score".to_string());
            writer.write_record(&header)?;
        }

        let mut record = vec![route.id.to_string()];
        record.extend(stats.values().map(|v| v.to_string()));
        record.push(format!("{:.4}", route.optimization_score()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

async fn optimize(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let Some(solver_url) = &config.solver_url else {
        anyhow::bail!("SOLVER_URL must be set to optimize");
    };

    let mut engines = RouteOptimizerFactory::new();
    for engine in [OptimizationEngine::Vroom, OptimizationEngine::Google] {
        let mut engine_config = HttpOptimizerConfig::new(solver_url.as_str(), engine);
        engine_config.timeout_seconds = config.solver_timeout_seconds;
        engines = engines.register(Arc::new(HttpRouteOptimizer::new(engine_config)?));
    }

    let service = OptimizationService::new(
        engines,
        BusinessRulesRegistry::with_defaults(Arc::new(StaticFeatureFlags::new())),
        vec![Arc::new(ReportUnassignedAppointments)],
        RouteOptimizationScoreCalculationService::with_weights(&config.metric_weights),
    );

    let mut source: OptimizationState = read_json(input)?;
    let result = service.optimize(&mut source).await?;

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Optimization result written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn schedule(config: &Config, input: &Path) -> Result<()> {
    let mut state: SchedulingState = read_json(input)?;

    let stats = SchedulingService::new(config.cluster_max_distance_miles)
        .schedule(&mut state, Utc::now());

    let output = json!({
        "stats": stats.to_map(),
        "resignedTechAssignments": state.resigned_tech_assignments(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
