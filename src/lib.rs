//! Route optimization core for field-service fleets
//!
//! Scores technician routes, drives an external route-solving engine
//! through a bounded retry loop and clusters pending services onto
//! scheduled routes.

pub mod config;
pub mod defaults;
pub mod services;
pub mod types;
