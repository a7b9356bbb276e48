//! Work events: everything that occupies a technician's day

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, Distance, Duration, TimeWindow};

/// Weighted-service value of an initial appointment
pub const INITIAL_APPOINTMENT_WEIGHT: i64 = 2;
/// Weighted-service value of any other appointment
pub const REGULAR_APPOINTMENT_WEIGHT: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub subscription_id: i64,
    pub customer_id: i64,
    pub description: String,
    pub location: Coordinates,
    pub duration: Duration,
    #[serde(default)]
    pub setup_duration: Duration,
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_reservice: bool,
    /// Locked appointments must stay on their route at their position
    #[serde(default)]
    pub is_locked: bool,
    /// Customer has already been told about this appointment
    #[serde(default)]
    pub is_notified: bool,
}

impl Appointment {
    pub fn is_regular(&self) -> bool {
        !self.is_initial && !self.is_reservice
    }

    pub fn weight(&self) -> i64 {
        if self.is_initial {
            INITIAL_APPOINTMENT_WEIGHT
        } else {
            REGULAR_APPOINTMENT_WEIGHT
        }
    }

    /// Service duration including setup
    pub fn total_service_time(&self) -> Duration {
        self.duration + self.setup_duration
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    pub id: i64,
    pub duration: Duration,
    pub distance: Distance,
    pub time_window: Option<TimeWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkBreak {
    pub id: i64,
    pub description: String,
    pub duration: Duration,
    /// Set once the engine has placed the break on the route
    pub time_window: Option<TimeWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: i64,
    pub description: String,
    pub location: Coordinates,
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedTime {
    pub id: i64,
    pub description: String,
    pub time_window: TimeWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteBoundary {
    pub location: Coordinates,
    pub time_window: Option<TimeWindow>,
}

/// A scheduled item on a route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkEvent {
    StartLocation(RouteBoundary),
    EndLocation(RouteBoundary),
    Appointment(Appointment),
    Travel(Travel),
    WorkBreak(WorkBreak),
    Meeting(Meeting),
    ReservedTime(ReservedTime),
}

impl WorkEvent {
    pub fn time_window(&self) -> Option<TimeWindow> {
        match self {
            WorkEvent::StartLocation(e) | WorkEvent::EndLocation(e) => e.time_window,
            WorkEvent::Appointment(e) => e.time_window,
            WorkEvent::Travel(e) => e.time_window,
            WorkEvent::WorkBreak(e) => e.time_window,
            WorkEvent::Meeting(e) => Some(e.time_window),
            WorkEvent::ReservedTime(e) => Some(e.time_window),
        }
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.time_window().map(|tw| tw.start)
    }

    pub fn as_appointment(&self) -> Option<&Appointment> {
        match self {
            WorkEvent::Appointment(appointment) => Some(appointment),
            _ => None,
        }
    }
}
