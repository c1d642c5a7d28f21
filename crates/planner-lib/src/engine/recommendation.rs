//! Human-readable guidance and discrete warnings

use super::advisor::recommended_thread_pool_size;
use super::metrics::timeout_proximity;
use crate::models::{BottleneckClassification, SimulationInput, SimulationMetrics};

/// Warning texts, each emitted at most once per evaluation
pub mod warnings {
    pub const THREAD_POOL_SATURATION: &str = "Thread pool saturation detected";
    pub const BEYOND_SAFE_UTILIZATION: &str = "System operating beyond safe utilization";
    pub const QUEUE_GROWTH: &str = "Queue growth may accelerate non-linearly under burst traffic";
    pub const LATENCY_AMPLIFIES_WAIT: &str = "Latency increase will exponentially increase queue wait";
    pub const HORIZONTAL_SCALING: &str = "Horizontal scaling recommended";
}

/// Guidance text keyed by the bottleneck class
pub fn scaling_recommendation(
    input: &SimulationInput,
    metrics: &SimulationMetrics,
    bottleneck: BottleneckClassification,
) -> String {
    match bottleneck {
        BottleneckClassification::Healthy => {
            "System is within safe bounds. Track latency variance before increasing traffic."
                .to_string()
        }
        BottleneckClassification::ThreadPoolSaturation => {
            let suggested = recommended_thread_pool_size(
                metrics.concurrency_required,
                input.target_utilization_pct,
            );
            format!(
                "Thread pool saturation detected. Increase worker threads toward {} or reduce latency to reclaim concurrency.",
                suggested
            )
        }
        BottleneckClassification::QueueSaturation => {
            "Queue saturation risk is elevated. Increase processing capacity first; queue growth without capacity can amplify tail latency."
                .to_string()
        }
        BottleneckClassification::TimeoutRisk => {
            "Latency is approaching timeout threshold. Optimize critical path latency or increase timeout only with downstream protections."
                .to_string()
        }
        BottleneckClassification::SystemOverload => {
            "System operating beyond safe utilization. Horizontal scaling recommended with immediate load shedding or rate limiting."
                .to_string()
        }
    }
}

/// Independent warning checks, in a fixed order
pub fn build_warnings(
    input: &SimulationInput,
    metrics: &SimulationMetrics,
    bottleneck: BottleneckClassification,
) -> Vec<String> {
    let checks = [
        (metrics.utilization_ratio > 1.0, warnings::THREAD_POOL_SATURATION),
        (metrics.utilization_ratio > 1.2, warnings::BEYOND_SAFE_UTILIZATION),
        (metrics.queue_pressure > 0.7, warnings::QUEUE_GROWTH),
        (timeout_proximity(input) > 0.9, warnings::LATENCY_AMPLIFIES_WAIT),
        (
            bottleneck == BottleneckClassification::SystemOverload,
            warnings::HORIZONTAL_SCALING,
        ),
    ];

    checks
        .into_iter()
        .filter(|(fired, _)| *fired)
        .map(|(_, text)| text.to_string())
        .collect()
}
