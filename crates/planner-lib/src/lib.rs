//! Capacity planning library for request-serving systems
//!
//! This crate provides the core functionality for:
//! - Deterministic queueing analysis of a single system description
//! - Bottleneck classification, queue risk and sizing advice
//! - Input validation
//! - Scenario persistence and comparison
//! - Health checks and observability

pub mod engine;
pub mod health;
pub mod models;
pub mod observability;
pub mod scenario;
pub mod validation;

pub use engine::{evaluate, run_simulation};
pub use health::{ComponentHealth, ComponentStatus, HealthResponse};
pub use models::*;
pub use observability::{PlannerMetrics, StructuredLogger};
pub use validation::{validate_input, validate_scenario_request, ValidationError};
