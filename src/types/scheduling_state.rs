//! Scheduling state of one office-day

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::{ClusterOfServices, Office, PendingService, ScheduledRoute, ServicePoint};

/// Pending service whose preferred technician no longer works for the office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResignedTechAssignment {
    pub subscription_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub preferred_tech_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingStats {
    pub routes_count: usize,
    pub capacity: u32,
    pub appointments_count: usize,
    pub scheduled_services_count: usize,
    pub rescheduled_services_count: usize,
    pub pending_services_count: usize,
    pub high_priority_pending_count: usize,
}

impl SchedulingStats {
    pub fn to_map(&self) -> Map<String, Value> {
        let value = json!({
            "routes_count": self.routes_count,
            "capacity": self.capacity,
            "appointments_count": self.appointments_count,
            "scheduled_services_count": self.scheduled_services_count,
            "rescheduled_services_count": self.rescheduled_services_count,
            "pending_services_count": self.pending_services_count,
            "high_priority_pending_count": self.high_priority_pending_count,
        });

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    pub date: NaiveDate,
    pub office: Office,
    #[serde(default)]
    pub scheduled_routes: Vec<ScheduledRoute>,
    #[serde(default)]
    pub pending_services: Vec<PendingService>,
    /// Employee ids of technicians currently employed by the office
    #[serde(default)]
    pub active_employee_ids: HashSet<i64>,
    #[serde(default)]
    resigned_tech_assignments: Vec<ResignedTechAssignment>,
}

impl SchedulingState {
    pub fn new(
        date: NaiveDate,
        office: Office,
        scheduled_routes: Vec<ScheduledRoute>,
        pending_services: Vec<PendingService>,
        active_employee_ids: HashSet<i64>,
    ) -> Self {
        Self {
            date,
            office,
            scheduled_routes,
            pending_services,
            active_employee_ids,
            resigned_tech_assignments: Vec::new(),
        }
    }

    /// One empty cluster per scheduled route, capacity taken as of `now`
    pub fn initial_clusters(&self, now: DateTime<Utc>) -> Vec<ClusterOfServices> {
        self.scheduled_routes
            .iter()
            .map(|route| {
                ClusterOfServices::new(
                    route.id,
                    route.capacity_at(now),
                    route.centroid(),
                    Some(route.service_pro.employee_id),
                )
            })
            .collect()
    }

    /// Pending services eligible for the scheduled date, projected to points
    pub fn pending_service_points_for_scheduled_date(&self) -> Vec<ServicePoint> {
        let weekday = self.date.weekday();

        self.pending_services
            .iter()
            .filter(|service| {
                service
                    .preferences
                    .preferred_day
                    .map_or(true, |day| day == weekday)
            })
            .enumerate()
            .map(|(index, service)| {
                ServicePoint::new(
                    index as i64 + 1,
                    service.subscription.id,
                    service.customer.location,
                    service.priority(),
                    service.preferred_employee_id(),
                )
            })
            .collect()
    }

    /// Move admitted services from the pending pool onto their routes.
    ///
    /// Routes are processed in their stored order. A service rescheduled to
    /// the scheduled date loses its booked appointment on every other route.
    pub fn assign_services_from_clusters(&mut self, clusters: &[ClusterOfServices]) {
        let clusters_by_route: HashMap<i64, &ClusterOfServices> =
            clusters.iter().map(|cluster| (cluster.id, cluster)).collect();

        for route_index in 0..self.scheduled_routes.len() {
            let route_id = self.scheduled_routes[route_index].id;
            let Some(cluster) = clusters_by_route.get(&route_id) else {
                continue;
            };
            if cluster.is_empty() {
                continue;
            }

            for point in cluster.services() {
                let Some(position) = self
                    .pending_services
                    .iter()
                    .position(|service| service.subscription.id == point.reference_id)
                else {
                    continue;
                };

                let service = self.pending_services.remove(position);
                let subscription_id = service.subscription.id;
                let rescheduled_today = service.is_rescheduled_to(self.date);
                self.scheduled_routes[route_index].add_pending_service(service);

                if rescheduled_today {
                    for (index, other) in self.scheduled_routes.iter_mut().enumerate() {
                        if index != route_index {
                            let removed = other.remove_appointments_of_subscription(subscription_id);
                            if removed > 0 {
                                debug!(
                                    "Removed {} duplicate appointment(s) of subscription {} from route {}",
                                    removed, subscription_id, other.id
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Clear preferences pointing at technicians who left the office
    pub fn reset_preferred_employees_of_resigned_techs(&mut self) -> usize {
        let mut reset = 0;

        for service in &mut self.pending_services {
            let Some(preferred) = service.preferred_employee_id() else {
                continue;
            };
            if self.active_employee_ids.contains(&preferred) {
                continue;
            }

            service.reset_preferred_employee();
            self.resigned_tech_assignments.push(ResignedTechAssignment {
                subscription_id: service.subscription.id,
                customer_id: service.customer.id,
                customer_name: service.customer.name.clone(),
                preferred_tech_id: preferred,
            });
            reset += 1;
        }

        if reset > 0 {
            info!(
                "Reset preferred technician on {} pending service(s) of office {}",
                reset, self.office.id
            );
        }

        reset
    }

    pub fn resigned_tech_assignments(&self) -> &[ResignedTechAssignment] {
        &self.resigned_tech_assignments
    }

    pub fn stats(&self, now: DateTime<Utc>) -> SchedulingStats {
        let scheduled = self.scheduled_routes.iter().flat_map(|r| r.pending_services.iter());

        SchedulingStats {
            routes_count: self.scheduled_routes.len(),
            capacity: self.scheduled_routes.iter().map(|r| r.capacity_at(now)).sum(),
            appointments_count: self.scheduled_routes.iter().map(|r| r.appointments.len()).sum(),
            scheduled_services_count: scheduled.clone().count(),
            rescheduled_services_count: scheduled.filter(|s| s.is_rescheduled()).count(),
            pending_services_count: self.pending_services.len(),
            high_priority_pending_count: self
                .pending_services
                .iter()
                .filter(|s| s.is_high_priority())
                .count(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::optimization_state::test_support::office;
    use crate::types::pending_service::test_support::{date, pending_service};
    use crate::types::scheduled_route::test_support::scheduled_route;

    /// Two routes on March 10 with one booked appointment each, three pending services
    pub fn scheduling_state() -> SchedulingState {
        let routes = vec![scheduled_route(1, date(10), 1), scheduled_route(2, date(10), 1)];
        let active = routes.iter().map(|r| r.service_pro.employee_id).collect();
        let pending = (1..=3).map(|n| pending_service(n, date(10))).collect();

        SchedulingState::new(date(10), office(), routes, pending, active)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::types::pending_service::test_support::{date, pending_service};
    use crate::types::AppointmentRef;
    use chrono::{TimeZone, Weekday};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_initial_clusters_mirror_routes() {
        let state = scheduling_state();
        let clusters = state.initial_clusters(now());

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, 1);
        assert_eq!(clusters[0].capacity, 21);
        assert_eq!(clusters[0].employee_id, Some(state.scheduled_routes[0].service_pro.employee_id));
        assert!(clusters.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_service_points_filtered_by_preferred_day() {
        let mut state = scheduling_state();
        // March 10, 2026 is a Tuesday
        state.pending_services[0].preferences.preferred_day = Some(Weekday::Tue);
        state.pending_services[1].preferences.preferred_day = Some(Weekday::Fri);

        let points = state.pending_service_points_for_scheduled_date();
        let references: Vec<i64> = points.iter().map(|p| p.reference_id).collect();
        assert_eq!(references, vec![1, 3]);
        assert!(points.iter().all(|p| !p.is_reserved()));
    }

    #[test]
    fn test_assign_services_moves_them_out_of_pool() {
        let mut state = scheduling_state();
        let mut points = state.pending_service_points_for_scheduled_date();
        let mut clusters = state.initial_clusters(now());
        clusters[0].add_service(&mut points[0]);
        clusters[1].add_service(&mut points[2]);

        state.assign_services_from_clusters(&clusters);

        assert_eq!(state.pending_services.len(), 1);
        assert_eq!(state.pending_services[0].subscription.id, 2);
        assert_eq!(state.scheduled_routes[0].pending_services[0].subscription.id, 1);
        assert_eq!(state.scheduled_routes[1].pending_services[0].subscription.id, 3);
    }

    #[test]
    fn test_rescheduled_service_is_not_double_booked() {
        let mut state = scheduling_state();
        let booked = state.scheduled_routes[1].appointments[0].clone();
        let rescheduled = pending_service(booked.subscription_id, date(10))
            .with_next_appointment(AppointmentRef { id: booked.id, date: date(10) });
        state.pending_services.push(rescheduled);

        let mut points = state.pending_service_points_for_scheduled_date();
        let mut clusters = state.initial_clusters(now());
        let point = points
            .iter_mut()
            .find(|p| p.reference_id == booked.subscription_id)
            .unwrap();
        clusters[0].add_service(point);

        state.assign_services_from_clusters(&clusters);

        assert!(state.scheduled_routes[1].appointments.is_empty());
        let on_route: usize = state
            .scheduled_routes
            .iter()
            .map(|r| {
                r.appointments.iter().filter(|a| a.subscription_id == booked.subscription_id).count()
                    + r.pending_services.iter().filter(|s| s.subscription.id == booked.subscription_id).count()
            })
            .sum();
        assert_eq!(on_route, 1);
    }

    #[test]
    fn test_unknown_clusters_and_references_are_ignored() {
        let mut state = scheduling_state();
        let mut cluster = ClusterOfServices::new(99, 5, state.office.location, None);
        cluster.add_service(&mut ServicePoint::new(1, 1, state.office.location, 50, None));
        let mut known = ClusterOfServices::new(1, 5, state.office.location, None);
        known.add_service(&mut ServicePoint::new(2, 404, state.office.location, 50, None));

        state.assign_services_from_clusters(&[cluster, known]);

        assert_eq!(state.pending_services.len(), 3);
        assert!(state.scheduled_routes.iter().all(|r| r.pending_services.is_empty()));
    }

    #[test]
    fn test_resigned_tech_preferences_are_reset() {
        let mut state = scheduling_state();
        let active_employee = state.scheduled_routes[0].service_pro.employee_id;
        state.pending_services[0].preferences.preferred_employee_id = Some(active_employee);
        state.pending_services[1].customer.preferred_tech_id = Some(555);
        state.pending_services[2].preferences.preferred_employee_id = Some(556);

        assert_eq!(state.reset_preferred_employees_of_resigned_techs(), 2);

        assert_eq!(state.pending_services[0].preferred_employee_id(), Some(active_employee));
        assert!(state.pending_services[1].customer.preferred_tech_id.is_none());
        assert!(state.pending_services[2].preferred_employee_id().is_none());

        let assignments = state.resigned_tech_assignments();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].subscription_id, 2);
        assert_eq!(assignments[0].preferred_tech_id, 555);
        assert_eq!(assignments[1].preferred_tech_id, 556);
    }

    #[test]
    fn test_stats() {
        let mut state = scheduling_state();
        state.pending_services.push(pending_service(9, date(25)));
        let mut points = state.pending_service_points_for_scheduled_date();
        let mut clusters = state.initial_clusters(now());
        clusters[0].add_service(&mut points[0]);
        state.assign_services_from_clusters(&clusters);

        let stats = state.stats(now());
        assert_eq!(stats.routes_count, 2);
        assert_eq!(stats.appointments_count, 2);
        assert_eq!(stats.scheduled_services_count, 1);
        assert_eq!(stats.rescheduled_services_count, 0);
        assert_eq!(stats.pending_services_count, 3);
        assert_eq!(stats.high_priority_pending_count, 1);
        assert_eq!(stats.capacity, 20 + 21);
        assert_eq!(stats.to_map()["pending_services_count"], 3);
    }
}
