//! Service-to-route clustering for a scheduling day
//!
//! Pending services are taken by descending priority. Each goes to the
//! nearest route cluster that still has room and accepts its preferred
//! technician, as long as that cluster is within the admission radius.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::defaults::CLUSTER_MAX_DISTANCE_MILES;
use crate::services::geo::distance_between;
use crate::types::{ClusterOfServices, SchedulingState, SchedulingStats, ServicePoint};

pub struct SchedulingService {
    max_distance_miles: f64,
}

impl Default for SchedulingService {
    fn default() -> Self {
        Self::new(CLUSTER_MAX_DISTANCE_MILES)
    }
}

impl SchedulingService {
    pub fn new(max_distance_miles: f64) -> Self {
        Self { max_distance_miles }
    }

    /// Run one clustering pass and move admitted services onto their routes
    pub fn schedule(&self, state: &mut SchedulingState, now: DateTime<Utc>) -> SchedulingStats {
        state.reset_preferred_employees_of_resigned_techs();

        let mut clusters = state.initial_clusters(now);
        let mut points = state.pending_service_points_for_scheduled_date();
        points.sort_by_key(|p| std::cmp::Reverse(p.priority));

        let mut admitted = 0;
        for point in &mut points {
            if point.is_reserved() {
                continue;
            }
            let Some(index) = self.nearest_cluster(&clusters, point) else {
                debug!("No route can take subscription {}", point.reference_id);
                continue;
            };
            if clusters[index].add_service(point) {
                admitted += 1;
            }
        }

        state.assign_services_from_clusters(&clusters);

        info!(
            "Scheduled {} of {} pending services across {} routes for office {} on {}",
            admitted,
            points.len(),
            clusters.len(),
            state.office.id,
            state.date
        );

        state.stats(now)
    }

    fn nearest_cluster(&self, clusters: &[ClusterOfServices], point: &ServicePoint) -> Option<usize> {
        clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| cluster.can_handle_service(point))
            .map(|(index, cluster)| (index, distance_between(&cluster.centroid, &point.location).miles()))
            .filter(|(_, miles)| *miles <= self.max_distance_miles)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
