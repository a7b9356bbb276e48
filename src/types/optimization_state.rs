//! Optimization state: the working set of one optimization run

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Appointment, Coordinates, MetricKey, Route, TimeWindow};

/// Identifier of the external route-solving engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationEngine {
    Vroom,
    Google,
}

impl OptimizationEngine {
    pub const fn as_str(self) -> &'static str {
        match self {
            OptimizationEngine::Vroom => "vroom",
            OptimizationEngine::Google => "google",
        }
    }
}

impl std::fmt::Display for OptimizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    Pre,
    Post,
    Plan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    pub id: i64,
    pub name: String,
    /// UTC offset of the office's local time, in seconds east of UTC
    pub utc_offset_seconds: i32,
    pub location: Coordinates,
}

impl Office {
    pub fn timezone(&self) -> FixedOffset {
        offset_or_utc(self.utc_offset_seconds)
    }
}

/// Fixed offset for `seconds` east of UTC, UTC when out of range
pub fn offset_or_utc(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

/// Solver tuning written by business rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineParameters {
    /// Multiplier on the engine's assumed travel speed
    pub average_speed_factor: f64,
    /// Multiplier on travel durations to account for traffic
    pub traffic_factor: f64,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            average_speed_factor: 1.0,
            traffic_factor: 1.0,
        }
    }
}

/// Audit entry for one rule that took part in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleExecutionResult {
    pub rule_id: String,
    pub name: String,
    pub description: String,
    pub triggered: bool,
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationState {
    pub id: Uuid,
    pub engine: OptimizationEngine,
    pub status: OptimizationStatus,
    pub date: NaiveDate,
    pub time_window: TimeWindow,
    pub office: Office,
    #[serde(default)]
    pub engine_parameters: EngineParameters,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub unassigned_appointments: Vec<Appointment>,
    /// Mean score per metric across routes
    #[serde(default)]
    pub weighted_metrics: BTreeMap<MetricKey, f64>,
    #[serde(default)]
    pub optimization_score: Option<f64>,
    #[serde(default)]
    pub rule_execution_results: Vec<RuleExecutionResult>,
}

impl OptimizationState {
    pub fn new(
        engine: OptimizationEngine,
        status: OptimizationStatus,
        time_window: TimeWindow,
        office: Office,
    ) -> Self {
        let date = time_window.start.with_timezone(&office.timezone()).date_naive();

        Self {
            id: Uuid::new_v4(),
            engine,
            status,
            date,
            time_window,
            office,
            engine_parameters: EngineParameters::default(),
            routes: Vec::new(),
            unassigned_appointments: Vec::new(),
            weighted_metrics: BTreeMap::new(),
            optimization_score: None,
            rule_execution_results: Vec::new(),
        }
    }

    pub fn has_unassigned_appointments(&self) -> bool {
        !self.unassigned_appointments.is_empty()
    }
}
