//! Business logic services

pub mod feature_flags;
pub mod geo;
pub mod optimization;
pub mod optimizer;
pub mod rules;
pub mod scheduling;
pub mod scoring;
pub mod service_duration;
pub mod statistics;
