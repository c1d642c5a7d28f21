//! Side-by-side comparison of two evaluated scenarios

use crate::models::{BottleneckClassification, QueueExplosionRisk, SimulationOutput};
use serde::Serialize;

/// Deltas below this magnitude are shown as zero
const DELTA_EPSILON: f64 = 0.0001;

/// Change of one scalar metric between baseline and candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub metric: &'static str,
    pub baseline: f64,
    pub candidate: f64,
    pub delta: f64,
    /// Decimal places used when rendering
    #[serde(skip)]
    pub precision: usize,
}

impl MetricDelta {
    fn new(metric: &'static str, baseline: f64, candidate: f64, precision: usize) -> Self {
        Self {
            metric,
            baseline,
            candidate,
            delta: candidate - baseline,
            precision,
        }
    }

    /// Signed delta, e.g. `+12.50` or `-3`
    pub fn formatted_delta(&self) -> String {
        if self.delta.abs() < DELTA_EPSILON {
            return format!("{:.*}", self.precision, 0.0);
        }
        let sign = if self.delta > 0.0 { "+" } else { "" };
        format!("{}{:.*}", sign, self.precision, self.delta)
    }

    pub fn formatted_baseline(&self) -> String {
        format!("{:.*}", self.precision, self.baseline)
    }

    pub fn formatted_candidate(&self) -> String {
        format!("{:.*}", self.precision, self.candidate)
    }
}

/// Before/after pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
}

impl<T: PartialEq> Transition<T> {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Everything that differs between a baseline and a candidate evaluation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub metrics: Vec<MetricDelta>,
    pub bottleneck: Transition<BottleneckClassification>,
    pub queue_explosion_risk: Transition<QueueExplosionRisk>,
    pub scaling_recommendation: Transition<String>,
    /// Present in the candidate only, in candidate order
    pub introduced_warnings: Vec<String>,
    /// Present in the baseline only, in baseline order
    pub resolved_warnings: Vec<String>,
}

impl ScenarioComparison {
    pub fn between(baseline: &SimulationOutput, candidate: &SimulationOutput) -> Self {
        let (b, c) = (&baseline.metrics, &candidate.metrics);
        let (ba, ca) = (&baseline.autoscaling_advisor, &candidate.autoscaling_advisor);

        let metrics = vec![
            MetricDelta::new(
                "Concurrency Required",
                b.concurrency_required,
                c.concurrency_required,
                2,
            ),
            MetricDelta::new("Utilization %", b.utilization_pct, c.utilization_pct, 2),
            MetricDelta::new("Queue Pressure", b.queue_pressure, c.queue_pressure, 2),
            MetricDelta::new(
                "Throughput Limit (rps)",
                b.throughput_limit,
                c.throughput_limit,
                2,
            ),
            MetricDelta::new(
                "Saturation Probability %",
                b.saturation_probability * 100.0,
                c.saturation_probability * 100.0,
                2,
            ),
            MetricDelta::new(
                "Recommended Threads",
                ba.recommended_thread_pool_size as f64,
                ca.recommended_thread_pool_size as f64,
                0,
            ),
            MetricDelta::new(
                "Estimated Min Instances",
                ba.estimated_min_instances as f64,
                ca.estimated_min_instances as f64,
                0,
            ),
        ];

        Self {
            metrics,
            bottleneck: Transition {
                from: baseline.bottleneck,
                to: candidate.bottleneck,
            },
            queue_explosion_risk: Transition {
                from: baseline.queue_explosion_risk,
                to: candidate.queue_explosion_risk,
            },
            scaling_recommendation: Transition {
                from: baseline.scaling_recommendation.clone(),
                to: candidate.scaling_recommendation.clone(),
            },
            introduced_warnings: difference(&candidate.warnings, &baseline.warnings),
            resolved_warnings: difference(&baseline.warnings, &candidate.warnings),
        }
    }

    /// True when neither classification nor any warning changed
    pub fn is_unchanged_classification(&self) -> bool {
        !self.bottleneck.changed()
            && !self.queue_explosion_risk.changed()
            && self.introduced_warnings.is_empty()
            && self.resolved_warnings.is_empty()
    }
}

/// Items of `left` missing from `right`, keeping `left` order
fn difference(left: &[String], right: &[String]) -> Vec<String> {
    left.iter()
        .filter(|warning| !right.contains(warning))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{evaluate, warnings};
    use crate::models::SimulationInput;

    fn healthy() -> SimulationOutput {
        evaluate(&SimulationInput {
            requests_per_second: 100.0,
            average_latency_ms: 200.0,
            thread_pool_size: 40,
            queue_size: 500,
            cpu_cores: None,
            target_utilization_pct: 80.0,
            timeout_threshold_ms: 2000.0,
        })
    }

    fn overloaded() -> SimulationOutput {
        evaluate(&SimulationInput {
            requests_per_second: 800.0,
            average_latency_ms: 500.0,
            thread_pool_size: 100,
            queue_size: 50,
            cpu_cores: None,
            target_utilization_pct: 70.0,
            timeout_threshold_ms: 600.0,
        })
    }

    #[test]
    fn test_self_comparison_has_no_changes() {
        let output = overloaded();
        let comparison = ScenarioComparison::between(&output, &output);

        assert!(comparison.is_unchanged_classification());
        assert!(comparison.metrics.iter().all(|m| m.delta == 0.0));
        assert!(!comparison.scaling_recommendation.changed());
    }

    #[test]
    fn test_degradation_introduces_warnings() {
        let comparison = ScenarioComparison::between(&healthy(), &overloaded());

        assert_eq!(comparison.bottleneck.from, BottleneckClassification::Healthy);
        assert_eq!(comparison.bottleneck.to, BottleneckClassification::SystemOverload);
        assert!(comparison.queue_explosion_risk.changed());
        assert!(comparison.resolved_warnings.is_empty());
        assert_eq!(comparison.introduced_warnings[0], warnings::THREAD_POOL_SATURATION);
        assert_eq!(comparison.introduced_warnings.len(), 4);
    }

    #[test]
    fn test_improvement_resolves_warnings() {
        let comparison = ScenarioComparison::between(&overloaded(), &healthy());

        assert!(comparison.introduced_warnings.is_empty());
        assert_eq!(comparison.resolved_warnings.len(), 4);

        let threads = comparison
            .metrics
            .iter()
            .find(|m| m.metric == "Recommended Threads")
            .unwrap();
        // 25 recommended for the healthy case against 572 overloaded
        assert_eq!(threads.delta, -547.0);
        assert_eq!(threads.formatted_delta(), "-547");
    }

    #[test]
    fn test_delta_formatting() {
        assert_eq!(MetricDelta::new("x", 1.0, 13.5, 2).formatted_delta(), "+12.50");
        assert_eq!(MetricDelta::new("x", 5.0, 5.00001, 2).formatted_delta(), "0.00");
        assert_eq!(MetricDelta::new("x", 2.0, 1.0, 0).formatted_delta(), "-1");
        assert_eq!(MetricDelta::new("x", 2.0, 1.0, 0).formatted_baseline(), "2");
    }
}
