//! Clustering-time types: service points and capacity-bounded clusters

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Projection of a pending service used while clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePoint {
    pub id: i64,
    /// Subscription id of the pending service this point stands for
    pub reference_id: i64,
    pub location: Coordinates,
    pub priority: u8,
    pub preferred_employee_id: Option<i64>,
    #[serde(default)]
    reserved: bool,
}

impl ServicePoint {
    pub fn new(
        id: i64,
        reference_id: i64,
        location: Coordinates,
        priority: u8,
        preferred_employee_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            reference_id,
            location,
            priority,
            preferred_employee_id,
            reserved: false,
        }
    }

    pub fn reserve(&mut self) {
        self.reserved = true;
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }
}

/// Services gathered around one scheduled route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOfServices {
    /// Id of the scheduled route the cluster belongs to
    pub id: i64,
    pub capacity: u32,
    pub centroid: Coordinates,
    /// Technician assigned to the route
    pub employee_id: Option<i64>,
    services: Vec<ServicePoint>,
}

impl ClusterOfServices {
    pub fn new(id: i64, capacity: u32, centroid: Coordinates, employee_id: Option<i64>) -> Self {
        Self {
            id,
            capacity,
            centroid,
            employee_id,
            services: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.services.len() >= self.capacity as usize
    }

    /// Points reserved by any cluster are not admitted again
    pub fn can_handle_service(&self, point: &ServicePoint) -> bool {
        if self.is_full() || point.is_reserved() {
            return false;
        }

        match (self.employee_id, point.preferred_employee_id) {
            (Some(employee_id), Some(preferred)) => employee_id == preferred,
            _ => true,
        }
    }

    pub fn contains(&self, point: &ServicePoint) -> bool {
        self.services.iter().any(|s| s.id == point.id)
    }

    /// Admit a point, reserving it. Returns false when it was not admitted.
    pub fn add_service(&mut self, point: &mut ServicePoint) -> bool {
        if self.contains(point) || !self.can_handle_service(point) {
            return false;
        }

        point.reserve();
        self.services.push(point.clone());
        true
    }

    pub fn services(&self) -> &[ServicePoint] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: i64, preferred_employee_id: Option<i64>) -> ServicePoint {
        ServicePoint::new(id, id * 10, Coordinates::new(35.0, -80.0), 50, preferred_employee_id)
    }

    #[test]
    fn test_cluster_respects_capacity() {
        let mut cluster = ClusterOfServices::new(1, 2, Coordinates::new(35.0, -80.0), None);

        assert!(cluster.add_service(&mut point(1, None)));
        assert!(cluster.add_service(&mut point(2, None)));

        let third = point(3, None);
        assert!(!cluster.can_handle_service(&third));
        assert!(!cluster.add_service(&mut third.clone()));
        assert_eq!(cluster.len(), 2);
    }

    #[test]
    fn test_zero_capacity_cluster_admits_nothing() {
        let cluster = ClusterOfServices::new(1, 0, Coordinates::new(35.0, -80.0), None);
        assert!(!cluster.can_handle_service(&point(1, None)));
    }

    #[test]
    fn test_cluster_checks_employee_preference() {
        let cluster = ClusterOfServices::new(1, 5, Coordinates::new(35.0, -80.0), Some(7));

        assert!(cluster.can_handle_service(&point(1, None)));
        assert!(cluster.can_handle_service(&point(2, Some(7))));
        assert!(!cluster.can_handle_service(&point(3, Some(8))));

        let unanchored = ClusterOfServices::new(2, 5, Coordinates::new(35.0, -80.0), None);
        assert!(unanchored.can_handle_service(&point(3, Some(8))));
    }

    #[test]
    fn test_adding_same_point_twice_counts_once() {
        let mut cluster = ClusterOfServices::new(1, 5, Coordinates::new(35.0, -80.0), None);
        let mut service_point = point(1, None);

        assert!(cluster.add_service(&mut service_point));
        assert!(service_point.is_reserved());
        assert!(!cluster.add_service(&mut service_point));
        assert_eq!(cluster.len(), 1);
    }

    #[test]
    fn test_point_reserved_by_one_cluster_is_refused_by_another() {
        let mut first = ClusterOfServices::new(1, 5, Coordinates::new(35.0, -80.0), None);
        let mut second = ClusterOfServices::new(2, 5, Coordinates::new(35.0, -80.0), None);
        let mut service_point = point(1, None);

        assert!(first.add_service(&mut service_point));
        assert!(!second.can_handle_service(&service_point));
        assert!(!second.add_service(&mut service_point));
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_reserve_is_idempotent() {
        let mut service_point = point(1, None);
        service_point.reserve();
        service_point.reserve();
        assert!(service_point.is_reserved());
    }
}
