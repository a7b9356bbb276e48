//! Route and fleet statistics
//!
//! Drive time is reported two ways: "between services" leaves out the first
//! and last travel legs (to the first appointment and back to the end
//! location), "full" counts every travel event on the route.

use chrono::NaiveDate;

use crate::types::stats::round_2;
use crate::types::{
    Distance, Duration, OptimizationState, OptimizationStateStats, Route, RouteStats, RouteSummary,
    Travel,
};

/// Whole minutes, rounded up, of `total` spread over `legs`
fn ceil_average(total: Duration, legs: i64) -> Duration {
    if legs == 0 {
        return Duration::ZERO;
    }
    let minutes = (total.total_seconds() as f64 / legs as f64 / 60.0).ceil() as i64;
    Duration::from_minutes(minutes)
}

fn mean_distance(total: Distance, legs: i64) -> Distance {
    if legs == 0 {
        return Distance::ZERO;
    }
    Distance::from_meters(total.meters() / legs as f64)
}

/// Travel events without the first and last leg
fn between_services_travels<'a>(travels: &'a [&'a Travel]) -> &'a [&'a Travel] {
    if travels.len() < 3 {
        return &[];
    }
    &travels[1..travels.len() - 1]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteStatisticsService;

impl RouteStatisticsService {
    pub fn new() -> Self {
        Self
    }

    pub fn stats(&self, route: &Route) -> RouteStats {
        let mut total_initials = 0;
        let mut total_reservices = 0;
        let mut total_regular = 0;
        let mut total_weighted_services = 0;
        let mut total_service_time = Duration::ZERO;

        for appointment in route.appointments() {
            if appointment.is_initial {
                total_initials += 1;
            }
            if appointment.is_reservice {
                total_reservices += 1;
            }
            if appointment.is_regular() {
                total_regular += 1;
            }
            total_weighted_services += appointment.weight();
            total_service_time += appointment.total_service_time();
        }

        let total_break_time: Duration = route
            .work_breaks()
            .filter(|b| b.time_window.is_some())
            .map(|b| b.duration)
            .sum();

        let travels: Vec<&Travel> = route.travel_events().collect();
        let between = between_services_travels(&travels);
        let between_services_legs = between.len() as i64;

        let total_drive_time: Duration = between.iter().map(|t| t.duration).sum();
        let total_drive_distance: Distance = between.iter().map(|t| t.distance).sum();
        let full_drive_time: Duration = travels.iter().map(|t| t.duration).sum();
        let full_drive_distance: Distance = travels.iter().map(|t| t.distance).sum();

        RouteStats {
            total_initials,
            total_reservices,
            total_regular,
            total_appointments: route.appointments().count() as i64,
            total_weighted_services,
            total_service_time,
            total_working_time: total_drive_time + total_service_time + total_break_time,
            total_break_time,
            total_drive_time,
            total_drive_distance,
            average_drive_time_between_services: ceil_average(total_drive_time, between_services_legs),
            average_drive_distance_between_services: mean_distance(
                total_drive_distance,
                between_services_legs,
            ),
            full_drive_time,
            full_drive_distance,
            between_services_legs,
        }
    }

    pub fn route_summary(&self, route: &Route, as_of: NaiveDate) -> RouteSummary {
        let stats = self.stats(route);
        let travels: Vec<&Travel> = route.travel_events().collect();

        let first_leg = travels.first().map_or(Duration::ZERO, |t| t.duration);
        let last_leg = if travels.len() >= 2 {
            travels.last().map_or(Duration::ZERO, |t| t.duration)
        } else {
            Duration::ZERO
        };

        RouteSummary {
            driving_time: stats.total_drive_time + first_leg + last_leg,
            service_time: stats.total_service_time,
            working_time: stats.total_working_time - stats.total_break_time,
            as_of,
            exclude_first_appointment: route.is_first_appointment_locked(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizationStateStatisticsService {
    route_statistics: RouteStatisticsService,
}

impl OptimizationStateStatisticsService {
    pub fn new(route_statistics: RouteStatisticsService) -> Self {
        Self { route_statistics }
    }

    pub fn stats(&self, state: &OptimizationState) -> OptimizationStateStats {
        let route_stats: Vec<RouteStats> = state
            .routes
            .iter()
            .map(|route| self.route_statistics.stats(route))
            .collect();

        let total_assigned_appointments: i64 = route_stats.iter().map(|s| s.total_appointments).sum();
        let total_drive_time: Duration = route_stats.iter().map(|s| s.total_drive_time).sum();
        let total_drive_distance: Distance = route_stats.iter().map(|s| s.total_drive_distance).sum();
        let total_legs: i64 = route_stats.iter().map(|s| s.between_services_legs).sum();
        let total_service_time: Duration = route_stats.iter().map(|s| s.total_service_time).sum();
        let total_working_time: Duration = route_stats.iter().map(|s| s.total_working_time).sum();

        let working_hours: Vec<f64> = route_stats
            .iter()
            .filter(|s| !s.total_working_time.is_zero())
            .map(|s| s.total_working_time.total_hours())
            .collect();
        let average_daily_working_hours = if working_hours.is_empty() {
            0.0
        } else {
            round_2(working_hours.iter().sum::<f64>() / working_hours.len() as f64)
        };

        let services_per_hour = if total_service_time.is_zero() {
            0.0
        } else {
            round_2(total_assigned_appointments as f64 / total_service_time.total_hours())
        };

        OptimizationStateStats {
            total_assigned_appointments,
            total_unassigned_appointments: state.unassigned_appointments.len() as i64,
            total_routes: state.routes.len() as i64,
            total_drive_time,
            total_drive_distance,
            average_drive_time_between_services: ceil_average(total_drive_time, total_legs),
            average_drive_distance_between_services: mean_distance(total_drive_distance, total_legs),
            total_service_time,
            total_working_time,
            full_drive_time: route_stats.iter().map(|s| s.full_drive_time).sum(),
            full_drive_distance: route_stats.iter().map(|s| s.full_drive_distance).sum(),
            average_daily_working_hours,
            services_per_hour,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::route::test_support::{appointment, route, travel, window};
    use crate::types::{Duration, Route, WorkBreak, WorkEvent};

    /// Two appointments (40 min service + 10 min setup), three travel legs, one 15 min break
    pub fn sample_route(id: i64) -> Route {
        let mut route = route(id);

        let mut first = appointment(1, 10, 20);
        first.setup_duration = Duration::from_minutes(5);
        let mut second = appointment(2, 45, 20);
        second.setup_duration = Duration::from_minutes(5);
        second.is_initial = true;

        route.add_event(travel(101, 0, 10, 3.0));
        route.add_event(WorkEvent::Appointment(first));
        route.add_event(travel(102, 30, 15, 5.0));
        route.add_event(WorkEvent::Appointment(second));
        route.add_event(WorkEvent::WorkBreak(WorkBreak {
            id: 201,
            description: "Lunch".to_string(),
            duration: Duration::from_minutes(15),
            time_window: Some(window(70, 15)),
        }));
        route.add_event(travel(103, 90, 12, 4.0));
        route
    }
}
