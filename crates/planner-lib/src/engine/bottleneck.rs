//! Bottleneck classification
//!
//! Rules are evaluated top to bottom and the first match wins. Several
//! predicates can hold at once, so table order is the tie-break.

use super::metrics::timeout_proximity;
use crate::models::{BottleneckClassification, SimulationInput, SimulationMetrics};

/// One ordered classification rule
pub struct BottleneckRule {
    pub name: &'static str,
    pub matches: fn(&SimulationInput, &SimulationMetrics) -> bool,
    pub classification: BottleneckClassification,
}

/// Classification rules in evaluation order
pub static BOTTLENECK_RULES: [BottleneckRule; 4] = [
    BottleneckRule {
        name: "utilization above 115% with queue overflow",
        matches: |_, m| m.utilization_ratio > 1.15 && m.queue_pressure > 1.0,
        classification: BottleneckClassification::SystemOverload,
    },
    BottleneckRule {
        name: "queue pressure above 0.8",
        matches: |_, m| m.queue_pressure > 0.8,
        classification: BottleneckClassification::QueueSaturation,
    },
    BottleneckRule {
        name: "utilization above target",
        matches: |_, m| m.utilization_ratio > 1.0,
        classification: BottleneckClassification::ThreadPoolSaturation,
    },
    BottleneckRule {
        name: "latency within 15% of timeout",
        matches: |input, _| timeout_proximity(input) >= 0.85,
        classification: BottleneckClassification::TimeoutRisk,
    },
];

/// Map metrics and input to exactly one bottleneck class
pub fn classify_bottleneck(
    input: &SimulationInput,
    metrics: &SimulationMetrics,
) -> BottleneckClassification {
    BOTTLENECK_RULES
        .iter()
        .find(|rule| (rule.matches)(input, metrics))
        .map(|rule| rule.classification)
        .unwrap_or(BottleneckClassification::Healthy)
}
