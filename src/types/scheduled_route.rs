//! Scheduling-time view of a route and its capacity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{offset_or_utc, Appointment, Coordinates, Duration, PendingService, RouteType, ServicePro};
use crate::defaults::{
    CAPACITY_FACTOR_FAR, CAPACITY_FACTOR_NEAR, CAPACITY_FACTOR_TWO_DAYS, CAPACITY_SLOT_DURATION,
    EXTENDED_ROUTE_CAPACITY, REGULAR_ROUTE_CAPACITY, SHORT_ROUTE_CAPACITY, UNKNOWN_ROUTE_CAPACITY,
};

/// Upper bound of services a route can still take
#[derive(Debug, Clone)]
pub struct RouteCapacity {
    route_type: RouteType,
    actual_capacity_count: Option<u32>,
    scheduled_durations: Vec<Duration>,
}

impl RouteCapacity {
    pub fn new(
        route_type: RouteType,
        actual_capacity_count: Option<u32>,
        scheduled_durations: Vec<Duration>,
    ) -> Self {
        Self {
            route_type,
            actual_capacity_count,
            scheduled_durations,
        }
    }

    fn base_capacity(&self) -> u32 {
        self.actual_capacity_count.unwrap_or(match self.route_type {
            RouteType::Regular => REGULAR_ROUTE_CAPACITY,
            RouteType::Extended => EXTENDED_ROUTE_CAPACITY,
            RouteType::Short => SHORT_ROUTE_CAPACITY,
            RouteType::Unknown => UNKNOWN_ROUTE_CAPACITY,
        })
    }

    /// Slots taken by one appointment, at least one
    fn slots_for(duration: Duration) -> u32 {
        let slot = CAPACITY_SLOT_DURATION.total_seconds();
        let slots = (duration.total_seconds() + slot - 1) / slot;
        slots.max(1) as u32
    }

    pub fn max_available(&self) -> u32 {
        let used: u32 = self
            .scheduled_durations
            .iter()
            .map(|d| Self::slots_for(*d))
            .sum();

        self.base_capacity().saturating_sub(used)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRoute {
    pub id: i64,
    pub date: NaiveDate,
    /// UTC offset of the route's local time, in seconds east of UTC
    pub utc_offset_seconds: i32,
    pub service_pro: ServicePro,
    #[serde(default)]
    pub route_type: RouteType,
    pub actual_capacity_count: Option<u32>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(default)]
    pub pending_services: Vec<PendingService>,
}

impl ScheduledRoute {
    pub fn days_until_service(&self, now: DateTime<Utc>) -> i64 {
        let today = now.with_timezone(&offset_or_utc(self.utc_offset_seconds)).date_naive();
        (self.date - today).num_days()
    }

    fn capacity_factor(days_until_service: i64) -> f64 {
        match days_until_service {
            d if d >= 3 => CAPACITY_FACTOR_FAR,
            2 => CAPACITY_FACTOR_TWO_DAYS,
            _ => CAPACITY_FACTOR_NEAR,
        }
    }

    pub fn max_available_capacity(&self) -> u32 {
        RouteCapacity::new(
            self.route_type,
            self.actual_capacity_count,
            self.appointments.iter().map(|a| a.duration).collect(),
        )
        .max_available()
    }

    /// Services the route can still take as of `now`
    pub fn capacity_at(&self, now: DateTime<Utc>) -> u32 {
        if !self.service_pro.has_service_skills() {
            return 0;
        }

        let factor = Self::capacity_factor(self.days_until_service(now));
        let offered = (f64::from(self.max_available_capacity()) * factor).round() as i64;

        (offered - self.pending_services.len() as i64).max(0) as u32
    }

    pub fn capacity(&self) -> u32 {
        self.capacity_at(Utc::now())
    }

    /// Mean of the appointment locations and the start location
    pub fn centroid(&self) -> Coordinates {
        let points = self
            .appointments
            .iter()
            .map(|a| a.location)
            .chain(std::iter::once(self.service_pro.start_location));

        let (count, lat, lng) = points.fold((0.0, 0.0, 0.0), |(n, lat, lng), p| {
            (n + 1.0, lat + p.lat, lng + p.lng)
        });

        Coordinates::new(lat / count, lng / count)
    }

    pub fn add_pending_service(&mut self, service: PendingService) {
        self.pending_services.push(service);
    }

    /// Drop booked appointments of a subscription, returns how many were removed
    pub fn remove_appointments_of_subscription(&mut self, subscription_id: i64) -> usize {
        let before = self.appointments.len();
        self.appointments.retain(|a| a.subscription_id != subscription_id);
        before - self.appointments.len()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::route::test_support::{appointment, service_pro};

    pub fn scheduled_route(id: i64, date: NaiveDate, appointment_count: i64) -> ScheduledRoute {
        ScheduledRoute {
            id,
            date,
            utc_offset_seconds: 0,
            service_pro: service_pro(id),
            route_type: RouteType::Regular,
            actual_capacity_count: None,
            appointments: (1..=appointment_count)
                .map(|n| appointment(id * 1000 + n, n * 40, 30))
                .collect(),
            pending_services: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::types::pending_service::test_support::{date, pending_service};
    use crate::types::Skill;
    use chrono::TimeZone;

    fn now_for(days_before: i64) -> DateTime<Utc> {
        let service_day = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        service_day - chrono::TimeDelta::days(days_before)
    }

    #[test]
    fn test_route_capacity_uses_type_default_and_slots() {
        let capacity = RouteCapacity::new(RouteType::Regular, None, vec![]);
        assert_eq!(capacity.max_available(), REGULAR_ROUTE_CAPACITY);

        let capacity = RouteCapacity::new(
            RouteType::Short,
            None,
            vec![Duration::from_minutes(30), Duration::from_minutes(31), Duration::from_minutes(5)],
        );
        // 1 + 2 + 1 slots
        assert_eq!(capacity.max_available(), SHORT_ROUTE_CAPACITY - 4);

        let capacity = RouteCapacity::new(RouteType::Short, Some(2), vec![Duration::from_minutes(90)]);
        assert_eq!(capacity.max_available(), 0);
    }

    #[test]
    fn test_capacity_factor_by_lead_time() {
        let route = scheduled_route(1, date(10), 2);
        // 22 - 2 booked slots = 20
        assert_eq!(route.max_available_capacity(), 20);
        assert_eq!(route.capacity_at(now_for(5)), 16);
        assert_eq!(route.capacity_at(now_for(3)), 16);
        assert_eq!(route.capacity_at(now_for(2)), 18);
        assert_eq!(route.capacity_at(now_for(1)), 20);
        assert_eq!(route.capacity_at(now_for(0)), 20);
    }

    #[test]
    fn test_capacity_never_exceeds_max_available() {
        let route = scheduled_route(1, date(10), 4);
        for days in 0..7 {
            assert!(route.capacity_at(now_for(days)) <= route.max_available_capacity());
        }
    }

    #[test]
    fn test_capacity_subtracts_pending_services_and_floors_at_zero() {
        let mut route = scheduled_route(1, date(10), 0);
        route.actual_capacity_count = Some(3);
        route.add_pending_service(pending_service(1, date(10)));
        assert_eq!(route.capacity_at(now_for(0)), 2);

        for n in 2..6 {
            route.add_pending_service(pending_service(n, date(10)));
        }
        assert_eq!(route.capacity_at(now_for(0)), 0);
    }

    #[test]
    fn test_capacity_is_zero_without_service_skills() {
        let mut route = scheduled_route(1, date(10), 0);
        route.service_pro.skills = vec![Skill::Personal(5)];
        assert_eq!(route.capacity_at(now_for(0)), 0);
    }

    #[test]
    fn test_days_until_service_uses_route_timezone() {
        let mut route = scheduled_route(1, date(10), 0);
        // 02:00 UTC on March 9 is still March 8 in UTC-5
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 2, 0, 0).unwrap();
        assert_eq!(route.days_until_service(now), 1);
        route.utc_offset_seconds = -5 * 3600;
        assert_eq!(route.days_until_service(now), 2);
    }

    #[test]
    fn test_centroid_includes_start_location() {
        let route = scheduled_route(1, date(10), 0);
        assert_eq!(route.centroid(), route.service_pro.start_location);

        let route = scheduled_route(1, date(10), 1);
        let expected_lat = (route.appointments[0].location.lat + route.service_pro.start_location.lat) / 2.0;
        assert!((route.centroid().lat - expected_lat).abs() < 1e-9);
    }

    #[test]
    fn test_remove_appointments_of_subscription() {
        let mut route = scheduled_route(1, date(10), 2);
        let subscription_id = route.appointments[0].subscription_id;
        assert_eq!(route.remove_appointments_of_subscription(subscription_id), 1);
        assert_eq!(route.appointments.len(), 1);
        assert_eq!(route.remove_appointments_of_subscription(subscription_id), 0);
    }
}
