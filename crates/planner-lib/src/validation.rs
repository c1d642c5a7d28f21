//! Input validation
//!
//! The engine assumes in-domain input. Everything that reaches it from the
//! outside goes through these checks first; all violations are collected so
//! a caller can report them together.

use crate::models::{CreateScenarioRequest, SimulationInput};
use thiserror::Error;

pub const MAX_REQUESTS_PER_SECOND: f64 = 1_000_000.0;
pub const MAX_AVERAGE_LATENCY_MS: f64 = 120_000.0;
pub const MAX_THREAD_POOL_SIZE: u32 = 100_000;
pub const MAX_QUEUE_SIZE: u32 = 1_000_000;
pub const MAX_CPU_CORES: u32 = 2048;
pub const MIN_TARGET_UTILIZATION_PCT: f64 = 1.0;
pub const MAX_TARGET_UTILIZATION_PCT: f64 = 99.0;
pub const MAX_TIMEOUT_THRESHOLD_MS: f64 = 300_000.0;

/// Scenario names are trimmed, then bounded by these lengths (in chars)
pub const MIN_SCENARIO_NAME_LEN: usize = 2;
pub const MAX_SCENARIO_NAME_LEN: usize = 120;

/// One or more out-of-domain fields
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid input: {}", .details.join("; "))]
pub struct ValidationError {
    pub details: Vec<String>,
}

/// Check every field of `input` against its documented range
pub fn validate_input(input: &SimulationInput) -> Result<(), ValidationError> {
    let mut details = Vec::new();
    collect_input_violations(input, &mut details);
    into_result(details)
}

/// Check a scenario name and its input
pub fn validate_scenario_request(request: &CreateScenarioRequest) -> Result<(), ValidationError> {
    let mut details = Vec::new();

    let name_len = request.name.trim().chars().count();
    if name_len < MIN_SCENARIO_NAME_LEN {
        details.push(format!(
            "name must contain at least {} characters",
            MIN_SCENARIO_NAME_LEN
        ));
    } else if name_len > MAX_SCENARIO_NAME_LEN {
        details.push(format!(
            "name must contain at most {} characters",
            MAX_SCENARIO_NAME_LEN
        ));
    }

    collect_input_violations(&request.input, &mut details);
    into_result(details)
}

fn collect_input_violations(input: &SimulationInput, details: &mut Vec<String>) {
    check_positive(
        "requestsPerSecond",
        input.requests_per_second,
        MAX_REQUESTS_PER_SECOND,
        details,
    );
    check_positive(
        "averageLatencyMs",
        input.average_latency_ms,
        MAX_AVERAGE_LATENCY_MS,
        details,
    );

    if input.thread_pool_size == 0 || input.thread_pool_size > MAX_THREAD_POOL_SIZE {
        details.push(format!(
            "threadPoolSize must be between 1 and {}",
            MAX_THREAD_POOL_SIZE
        ));
    }

    if input.queue_size > MAX_QUEUE_SIZE {
        details.push(format!("queueSize must be at most {}", MAX_QUEUE_SIZE));
    }

    if let Some(cores) = input.cpu_cores {
        if cores == 0 || cores > MAX_CPU_CORES {
            details.push(format!("cpuCores must be between 1 and {}", MAX_CPU_CORES));
        }
    }

    let target = input.target_utilization_pct;
    if !target.is_finite()
        || !(MIN_TARGET_UTILIZATION_PCT..=MAX_TARGET_UTILIZATION_PCT).contains(&target)
    {
        details.push(format!(
            "targetUtilizationPct must be between {} and {}",
            MIN_TARGET_UTILIZATION_PCT, MAX_TARGET_UTILIZATION_PCT
        ));
    }

    check_positive(
        "timeoutThresholdMs",
        input.timeout_threshold_ms,
        MAX_TIMEOUT_THRESHOLD_MS,
        details,
    );
}

/// `value` must be finite and in `(0, max]`
fn check_positive(field: &str, value: f64, max: f64, details: &mut Vec<String>) {
    if !value.is_finite() {
        details.push(format!("{} must be a finite number", field));
    } else if value <= 0.0 {
        details.push(format!("{} must be greater than 0", field));
    } else if value > max {
        details.push(format!("{} must be at most {}", field, max));
    }
}

fn into_result(details: Vec<String>) -> Result<(), ValidationError> {
    if details.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { details })
    }
}
