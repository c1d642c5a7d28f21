//! Observability infrastructure for the capacity planner
//!
//! Provides:
//! - Prometheus metrics (evaluation latency, verdict counts, scenario activity)
//! - Structured JSON logging with tracing

use crate::models::{QueueExplosionRisk, SimulationOutput};
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for evaluation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PlannerMetricsInner> = OnceLock::new();

struct PlannerMetricsInner {
    evaluation_latency_seconds: Histogram,
    simulations_total: IntCounterVec,
    queue_risk_total: IntCounterVec,
    validation_failures_total: IntCounter,
    scenarios_saved_total: IntCounter,
    scenarios_deleted_total: IntCounter,
}

impl PlannerMetricsInner {
    fn new() -> Self {
        Self {
            evaluation_latency_seconds: register_histogram!(
                "capacity_planner_evaluation_latency_seconds",
                "Time spent evaluating a single simulation input",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register evaluation_latency_seconds"),

            simulations_total: register_int_counter_vec!(
                "capacity_planner_simulations_total",
                "Evaluations performed, by bottleneck classification",
                &["bottleneck"]
            )
            .expect("Failed to register simulations_total"),

            queue_risk_total: register_int_counter_vec!(
                "capacity_planner_queue_risk_total",
                "Evaluations performed, by queue explosion risk",
                &["risk"]
            )
            .expect("Failed to register queue_risk_total"),

            validation_failures_total: register_int_counter!(
                "capacity_planner_validation_failures_total",
                "Requests rejected because of out-of-domain input"
            )
            .expect("Failed to register validation_failures_total"),

            scenarios_saved_total: register_int_counter!(
                "capacity_planner_scenarios_saved_total",
                "Scenarios persisted"
            )
            .expect("Failed to register scenarios_saved_total"),

            scenarios_deleted_total: register_int_counter!(
                "capacity_planner_scenarios_deleted_total",
                "Scenarios deleted"
            )
            .expect("Failed to register scenarios_deleted_total"),
        }
    }
}

/// Planner metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying collectors.
#[derive(Clone)]
pub struct PlannerMetrics {
    _private: (),
}

impl Default for PlannerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PlannerMetricsInner {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new)
    }

    /// Record one evaluation and its verdicts
    pub fn observe_simulation(&self, duration_secs: f64, output: &SimulationOutput) {
        let inner = self.inner();
        inner.evaluation_latency_seconds.observe(duration_secs);
        inner
            .simulations_total
            .with_label_values(&[output.bottleneck.as_str()])
            .inc();
        inner
            .queue_risk_total
            .with_label_values(&[output.queue_explosion_risk.as_str()])
            .inc();
    }

    pub fn inc_validation_failures(&self) {
        self.inner().validation_failures_total.inc();
    }

    pub fn inc_scenarios_saved(&self) {
        self.inner().scenarios_saved_total.inc();
    }

    pub fn inc_scenarios_deleted(&self) {
        self.inner().scenarios_deleted_total.inc();
    }

    /// Number of evaluations recorded for a bottleneck label
    pub fn simulations_for(&self, bottleneck: &str) -> u64 {
        self.inner()
            .simulations_total
            .with_label_values(&[bottleneck])
            .get()
    }
}

/// Structured logger for planner events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    /// Log a completed evaluation; high queue risk is logged as a warning
    pub fn log_simulation(&self, output: &SimulationOutput, source: &str) {
        let metrics = &output.metrics;
        if output.queue_explosion_risk == QueueExplosionRisk::High {
            warn!(
                event = "simulation_evaluated",
                instance = %self.instance,
                source = %source,
                bottleneck = %output.bottleneck,
                queue_risk = %output.queue_explosion_risk,
                utilization_pct = metrics.utilization_pct,
                queue_pressure = metrics.queue_pressure,
                warnings = output.warnings.len(),
                "Evaluated system is at risk of unbounded queue growth"
            );
        } else {
            info!(
                event = "simulation_evaluated",
                instance = %self.instance,
                source = %source,
                bottleneck = %output.bottleneck,
                queue_risk = %output.queue_explosion_risk,
                utilization_pct = metrics.utilization_pct,
                queue_pressure = metrics.queue_pressure,
                warnings = output.warnings.len(),
                "Evaluated simulation input"
            );
        }
    }

    pub fn log_validation_failure(&self, source: &str, details: &[String]) {
        warn!(
            event = "validation_failed",
            instance = %self.instance,
            source = %source,
            violations = details.len(),
            details = %details.join("; "),
            "Rejected out-of-domain input"
        );
    }

    pub fn log_scenario_saved(&self, id: i64, name: &str, output: &SimulationOutput) {
        info!(
            event = "scenario_saved",
            instance = %self.instance,
            scenario_id = id,
            scenario_name = %name,
            bottleneck = %output.bottleneck,
            "Saved scenario"
        );
    }

    pub fn log_scenario_deleted(&self, id: i64) {
        info!(
            event = "scenario_deleted",
            instance = %self.instance,
            scenario_id = id,
            "Deleted scenario"
        );
    }

    pub fn log_startup(&self, version: &str, bind_address: &str, database_url: &str) {
        info!(
            event = "planner_started",
            instance = %self.instance,
            planner_version = %version,
            bind_address = %bind_address,
            database_url = %database_url,
            "Capacity planner started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "planner_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Capacity planner shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use crate::models::SimulationInput;

    fn overloaded() -> SimulationOutput {
        evaluate(&SimulationInput {
            requests_per_second: 800.0,
            average_latency_ms: 500.0,
            thread_pool_size: 25,
            queue_size: 100,
            cpu_cores: None,
            target_utilization_pct: 70.0,
            timeout_threshold_ms: 600.0,
        })
    }

    #[test]
    fn test_observe_simulation_counts_by_bottleneck() {
        let metrics = PlannerMetrics::new();
        let output = overloaded();
        let label = output.bottleneck.as_str();

        let before = metrics.simulations_for(label);
        metrics.observe_simulation(0.0002, &output);
        assert!(metrics.simulations_for(label) > before);

        metrics.inc_validation_failures();
        metrics.inc_scenarios_saved();
        metrics.inc_scenarios_deleted();
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("planner-test");
        assert_eq!(logger.instance, "planner-test");

        logger.log_simulation(&overloaded(), "test");
        logger.log_validation_failure("test", &["queueSize must be at most 1000000".to_string()]);
    }
}
