//! Route and fleet statistics snapshots

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{Distance, Duration};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Statistics derived from one route's events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub total_initials: i64,
    pub total_reservices: i64,
    pub total_regular: i64,
    pub total_appointments: i64,
    pub total_weighted_services: i64,
    pub total_service_time: Duration,
    pub total_working_time: Duration,
    pub total_break_time: Duration,
    /// Driving between appointments, first and last legs excluded
    pub total_drive_time: Duration,
    pub total_drive_distance: Distance,
    pub average_drive_time_between_services: Duration,
    pub average_drive_distance_between_services: Distance,
    /// Driving including the legs from/to the start and end locations
    pub full_drive_time: Duration,
    pub full_drive_distance: Distance,
    /// Number of travel legs counted in `total_drive_time`
    pub between_services_legs: i64,
}

impl RouteStats {
    /// Flat map of rounded values as persisted with the route
    pub fn to_map(&self) -> Map<String, Value> {
        let value = json!({
            "total_initials": self.total_initials,
            "total_reservices": self.total_reservices,
            "total_regular": self.total_regular,
            "total_appointments": self.total_appointments,
            "total_weighted_services": self.total_weighted_services,
            "total_service_time_minutes": self.total_service_time.total_minutes(),
            "total_working_time_minutes": self.total_working_time.total_minutes(),
            "total_break_time_minutes": self.total_break_time.total_minutes(),
            "total_drive_time_minutes": self.total_drive_time.total_minutes(),
            "total_drive_miles": round_to(self.total_drive_distance.miles(), 2),
            "average_drive_time_between_services": self.average_drive_time_between_services.total_minutes(),
            "average_drive_miles_between_services": round_to(self.average_drive_distance_between_services.miles(), 2),
            "full_drive_time_minutes": self.full_drive_time.total_minutes(),
            "full_drive_miles": round_to(self.full_drive_distance.miles(), 2),
        });

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Condensed view of a route for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub driving_time: Duration,
    pub service_time: Duration,
    pub working_time: Duration,
    pub as_of: NaiveDate,
    /// Consumers skip the first appointment when recalculating if set
    pub exclude_first_appointment: bool,
}

/// Fleet-wide statistics of one optimization state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationStateStats {
    pub total_assigned_appointments: i64,
    pub total_unassigned_appointments: i64,
    pub total_routes: i64,
    pub total_drive_time: Duration,
    pub total_drive_distance: Distance,
    pub average_drive_time_between_services: Duration,
    pub average_drive_distance_between_services: Distance,
    pub total_service_time: Duration,
    pub total_working_time: Duration,
    pub full_drive_time: Duration,
    pub full_drive_distance: Distance,
    pub average_daily_working_hours: f64,
    pub services_per_hour: f64,
}

impl OptimizationStateStats {
    pub fn to_map(&self) -> Map<String, Value> {
        let value = json!({
            "total_assigned_appointments": self.total_assigned_appointments,
            "total_unassigned_appointments": self.total_unassigned_appointments,
            "total_routes": self.total_routes,
            "total_drive_time": self.total_drive_time.total_minutes(),
            "total_drive_miles": round_to(self.total_drive_distance.miles(), 2),
            "average_drive_time_between_services": self.average_drive_time_between_services.total_minutes(),
            "average_drive_miles_between_services": round_to(self.average_drive_distance_between_services.miles(), 2),
            "total_service_time": self.total_service_time.total_minutes(),
            "total_working_time": self.total_working_time.total_minutes(),
            "full_drive_time": self.full_drive_time.total_minutes(),
            "full_drive_miles": round_to(self.full_drive_distance.miles(), 2),
            "average_daily_working_hours": self.average_daily_working_hours,
            "services_per_hour": self.services_per_hour,
        });

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

pub(crate) fn round_2(value: f64) -> f64 {
    round_to(value, 2)
}
