//! Customer types

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Customer record as known to the fleet-management data source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub location: Coordinates,
    /// Technician the customer asked for, cleared when that technician resigns
    pub preferred_tech_id: Option<i64>,
}

/// Scheduling preferences attached to a subscription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPreferences {
    pub preferred_start: Option<NaiveTime>,
    pub preferred_end: Option<NaiveTime>,
    pub preferred_day: Option<Weekday>,
    pub preferred_employee_id: Option<i64>,
}
