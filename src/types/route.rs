//! Route types (one technician's day)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Appointment, Coordinates, Metric, RouteBoundary, Travel, WorkBreak, WorkEvent};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route {route_id} has {starts} start and {ends} end locations, expected one of each")]
    InvalidBoundaries {
        route_id: i64,
        starts: usize,
        ends: usize,
    },
}

/// Route type, drives the default capacity of a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    Regular,
    Extended,
    Short,
    #[default]
    Unknown,
}

impl RouteType {
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteType::Regular => "regular",
            RouteType::Extended => "extended",
            RouteType::Short => "short",
            RouteType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Initial,
    Regular,
    Reservice,
    Commercial,
    /// Skill matching a technician to customers who asked for them by name
    Personal(i64),
}

impl Skill {
    pub fn is_personal(&self) -> bool {
        matches!(self, Skill::Personal(_))
    }
}

/// Technician assigned to a route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePro {
    pub id: i64,
    pub name: String,
    /// Employee id in the fleet-management system
    pub employee_id: i64,
    pub skills: Vec<Skill>,
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

impl ServicePro {
    pub fn has_service_skills(&self) -> bool {
        self.skills.iter().any(|skill| !skill.is_personal())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub breaks: u32,
    pub inside_sales: u32,
    pub summary: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            breaks: 3,
            inside_sales: 0,
            summary: false,
        }
    }
}

/// Route aggregate: an ordered sequence of work events
///
/// Decoded routes are rebuilt event by event, so payloads in any order come
/// out chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RouteData")]
pub struct Route {
    pub id: i64,
    pub date: NaiveDate,
    pub service_pro: ServicePro,
    #[serde(default)]
    pub route_type: RouteType,
    pub actual_capacity_count: Option<u32>,
    #[serde(default)]
    pub config: RouteConfig,
    events: Vec<WorkEvent>,
    #[serde(default)]
    metrics: Vec<Metric>,
}

impl Route {
    pub fn new(id: i64, date: NaiveDate, service_pro: ServicePro, route_type: RouteType) -> Self {
        let events = vec![
            WorkEvent::StartLocation(RouteBoundary {
                location: service_pro.start_location,
                time_window: None,
            }),
            WorkEvent::EndLocation(RouteBoundary {
                location: service_pro.end_location,
                time_window: None,
            }),
        ];

        Self {
            id,
            date,
            service_pro,
            route_type,
            actual_capacity_count: None,
            config: RouteConfig::default(),
            events,
            metrics: Vec::new(),
        }
    }

    /// Insert an event keeping the sequence chronological.
    ///
    /// Events without a time window go right before the end location.
    pub fn add_event(&mut self, event: WorkEvent) {
        let position = match event.start_at() {
            Some(start) => self.events.iter().position(|existing| match existing {
                WorkEvent::EndLocation(_) => true,
                WorkEvent::StartLocation(_) => false,
                other => matches!(other.start_at(), Some(s) if s > start),
            }),
            None => self
                .events
                .iter()
                .position(|existing| matches!(existing, WorkEvent::EndLocation(_))),
        };

        match position {
            Some(index) => self.events.insert(index, event),
            None => self.events.push(event),
        }
    }

    pub fn events(&self) -> &[WorkEvent] {
        &self.events
    }

    pub fn appointments(&self) -> impl Iterator<Item = &Appointment> {
        self.events.iter().filter_map(WorkEvent::as_appointment)
    }

    pub fn appointments_mut(&mut self) -> impl Iterator<Item = &mut Appointment> {
        self.events.iter_mut().filter_map(|event| match event {
            WorkEvent::Appointment(appointment) => Some(appointment),
            _ => None,
        })
    }

    pub fn travel_events(&self) -> impl Iterator<Item = &Travel> {
        self.events.iter().filter_map(|event| match event {
            WorkEvent::Travel(travel) => Some(travel),
            _ => None,
        })
    }

    pub fn work_breaks(&self) -> impl Iterator<Item = &WorkBreak> {
        self.events.iter().filter_map(|event| match event {
            WorkEvent::WorkBreak(work_break) => Some(work_break),
            _ => None,
        })
    }

    pub fn is_first_appointment_locked(&self) -> bool {
        self.appointments().next().is_some_and(|a| a.is_locked)
    }

    /// Attach a metric, replacing any previous value for the same key
    pub fn set_metric(&mut self, metric: Metric) {
        self.metrics.retain(|m| m.key != metric.key);
        self.metrics.push(metric);
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn total_metric_weight(&self) -> f64 {
        self.metrics.iter().map(|m| m.weight).sum()
    }

    /// Sum of metric scores, `0..=1` when weights are valid
    pub fn optimization_score(&self) -> f64 {
        self.metrics.iter().map(|m| m.score).sum()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteData {
    id: i64,
    date: NaiveDate,
    service_pro: ServicePro,
    #[serde(default)]
    route_type: RouteType,
    actual_capacity_count: Option<u32>,
    #[serde(default)]
    config: RouteConfig,
    events: Vec<WorkEvent>,
    #[serde(default)]
    metrics: Vec<Metric>,
}

impl TryFrom<RouteData> for Route {
    type Error = RouteError;

    fn try_from(data: RouteData) -> Result<Self, Self::Error> {
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        let mut others = Vec::new();
        for event in data.events {
            match event {
                WorkEvent::StartLocation(_) => starts.push(event),
                WorkEvent::EndLocation(_) => ends.push(event),
                _ => others.push(event),
            }
        }

        if starts.len() != 1 || ends.len() != 1 {
            return Err(RouteError::InvalidBoundaries {
                route_id: data.id,
                starts: starts.len(),
                ends: ends.len(),
            });
        }

        let mut route = Route {
            id: data.id,
            date: data.date,
            service_pro: data.service_pro,
            route_type: data.route_type,
            actual_capacity_count: data.actual_capacity_count,
            config: data.config,
            events: starts.into_iter().chain(ends).collect(),
            metrics: data.metrics,
        };
        for event in others {
            route.add_event(event);
        }

        Ok(route)
    }
}
