//! Scalar value types shared by routes, statistics and scheduling

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const METERS_PER_MILE: f64 = 1609.344;

/// Time span stored in whole seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * 60)
    }

    pub const fn total_seconds(self) -> i64 {
        self.0
    }

    /// Whole minutes, truncated
    pub const fn total_minutes(self) -> i64 {
        self.0 / 60
    }

    pub fn total_hours(self) -> f64 {
        self.0 as f64 / 3600.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::ZERO, Add::add)
    }
}

impl From<chrono::TimeDelta> for Duration {
    fn from(delta: chrono::TimeDelta) -> Self {
        Duration(delta.num_seconds())
    }
}

/// Road distance stored in meters
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distance(f64);

impl Distance {
    pub const ZERO: Distance = Distance(0.0);

    pub fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub fn from_kilometers(kilometers: f64) -> Self {
        Self(kilometers * 1000.0)
    }

    pub fn from_miles(miles: f64) -> Self {
        Self(miles * METERS_PER_MILE)
    }

    pub fn meters(self) -> f64 {
        self.0
    }

    pub fn kilometers(self) -> f64 {
        self.0 / 1000.0
    }

    pub fn miles(self) -> f64 {
        self.0 / METERS_PER_MILE
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        Distance(self.0 + rhs.0)
    }
}

impl AddAssign for Distance {
    fn add_assign(&mut self, rhs: Distance) {
        self.0 += rhs.0;
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Distance>>(iter: I) -> Distance {
        iter.fold(Distance::ZERO, Add::add)
    }
}

/// Absolute time window of a work event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        Duration::from(self.end - self.start)
    }

    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        moment >= self.start && moment <= self.end
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn length_in_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_arithmetic() {
        let total: Duration = [Duration::from_minutes(10), Duration::from_seconds(90)]
            .into_iter()
            .sum();

        assert_eq!(total.total_seconds(), 690);
        assert_eq!(total.total_minutes(), 11);
        assert_eq!((total - Duration::from_seconds(90)).total_minutes(), 10);
        assert!((Duration::from_minutes(90).total_hours() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_units() {
        let distance = Distance::from_miles(1.0) + Distance::from_kilometers(1.0);

        assert!((distance.meters() - 2609.344).abs() < 1e-9);
        assert!((Distance::from_meters(1609.344).miles() - 1.0).abs() < 1e-9);
        assert!((Distance::from_meters(2500.0).kilometers() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_time_window_duration() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 2, 9, 15, 0).unwrap();
        let window = TimeWindow::new(start, end);

        assert_eq!(window.duration(), Duration::from_minutes(75));
        assert!(window.contains(start));
        assert!(!window.contains(end + chrono::TimeDelta::seconds(1)));
    }

    #[test]
    fn test_duration_serializes_as_seconds() {
        let json = serde_json::to_string(&Duration::from_minutes(2)).unwrap();
        assert_eq!(json, "120");
    }
}
