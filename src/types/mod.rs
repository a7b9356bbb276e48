//! Type definitions

pub mod cluster;
pub mod customer;
pub mod metric;
pub mod optimization_state;
pub mod pending_service;
pub mod route;
pub mod scheduled_route;
pub mod scheduling_state;
pub mod service_history;
pub mod stats;
pub mod value;
pub mod work_event;

pub use cluster::*;
pub use customer::*;
pub use metric::*;
pub use optimization_state::*;
pub use pending_service::*;
pub use route::*;
pub use scheduled_route::*;
pub use scheduling_state::*;
pub use service_history::*;
pub use stats::*;
pub use value::*;
pub use work_event::*;
