use crate::types::Duration;

/// Solver invocations allowed per optimization run
pub const MAX_OPTIMIZATION_ATTEMPTS: usize = 3;

pub const MAX_PRIORITY: u8 = 100;
pub const MIN_PRIORITY: u8 = 1;

/// Capacity of a route type when the route has no actual capacity count
pub const REGULAR_ROUTE_CAPACITY: u32 = 22;
pub const EXTENDED_ROUTE_CAPACITY: u32 = 26;
pub const SHORT_ROUTE_CAPACITY: u32 = 12;
pub const UNKNOWN_ROUTE_CAPACITY: u32 = 18;

/// Length of one capacity slot; longer appointments use several
pub const CAPACITY_SLOT_DURATION: Duration = Duration::from_minutes(30);

/// Share of the capacity offered depending on days left until the service date
pub const CAPACITY_FACTOR_FAR: f64 = 0.8;
pub const CAPACITY_FACTOR_TWO_DAYS: f64 = 0.9;
pub const CAPACITY_FACTOR_NEAR: f64 = 1.0;

/// Clustering admission radius
pub const CLUSTER_MAX_DISTANCE_MILES: f64 = 50.0;

pub const SOLVER_TIMEOUT_SECONDS: u64 = 60;
