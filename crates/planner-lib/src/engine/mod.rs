//! Capacity simulation and classification engine
//!
//! A short pipeline of pure functions over an immutable input:
//! metrics, bottleneck and queue-risk classification, autoscaling advice,
//! then recommendation text and warnings. No state, no I/O.

mod advisor;
mod bottleneck;
mod metrics;
mod queue_risk;
mod recommendation;

pub use advisor::{build_autoscaling_advisor, recommended_thread_pool_size};
pub use bottleneck::{classify_bottleneck, BottleneckRule, BOTTLENECK_RULES};
pub use metrics::{calculate_metrics, clamp, timeout_proximity};
pub use queue_risk::{classify_queue_risk, QueueRiskRule, QUEUE_RISK_RULES};
pub use recommendation::{build_warnings, scaling_recommendation, warnings};

use crate::models::{SimulationInput, SimulationOutput};

/// Run the full pipeline for one input
pub fn run_simulation(input: &SimulationInput) -> SimulationOutput {
    let metrics = calculate_metrics(input);
    let bottleneck = classify_bottleneck(input, &metrics);
    let queue_explosion_risk = classify_queue_risk(&metrics);
    let autoscaling_advisor = build_autoscaling_advisor(input, &metrics);
    let scaling_recommendation = scaling_recommendation(input, &metrics, bottleneck);
    let warnings = build_warnings(input, &metrics, bottleneck);

    SimulationOutput {
        input: input.clone(),
        metrics,
        bottleneck,
        queue_explosion_risk,
        autoscaling_advisor,
        scaling_recommendation,
        warnings,
    }
}

/// Evaluate an already-validated input
///
/// Callers are expected to run [`crate::validation::validate_input`] first;
/// out-of-domain input produces unspecified (but non-panicking) output.
pub fn evaluate(input: &SimulationInput) -> SimulationOutput {
    run_simulation(input)
}
