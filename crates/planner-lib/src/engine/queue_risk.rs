//! Queue explosion risk, independent of the bottleneck class

use crate::models::{QueueExplosionRisk, SimulationMetrics};

/// One ordered risk rule
pub struct QueueRiskRule {
    pub matches: fn(&SimulationMetrics) -> bool,
    pub risk: QueueExplosionRisk,
}

/// Risk rules in evaluation order, first match wins
pub static QUEUE_RISK_RULES: [QueueRiskRule; 2] = [
    QueueRiskRule {
        matches: |m| m.queue_pressure > 1.0 || m.saturation_probability > 0.85,
        risk: QueueExplosionRisk::High,
    },
    QueueRiskRule {
        matches: |m| m.queue_pressure > 0.5 || m.saturation_probability > 0.6,
        risk: QueueExplosionRisk::Medium,
    },
];

pub fn classify_queue_risk(metrics: &SimulationMetrics) -> QueueExplosionRisk {
    QUEUE_RISK_RULES
        .iter()
        .find(|rule| (rule.matches)(metrics))
        .map(|rule| rule.risk)
        .unwrap_or(QueueExplosionRisk::Low)
}
