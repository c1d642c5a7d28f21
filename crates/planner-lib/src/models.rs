//! Core data models for the capacity planner
//!
//! All records serialize with camelCase field names so the JSON shape is
//! shared verbatim by the HTTP service, the CLI and stored scenarios.

use serde::{Deserialize, Serialize};

/// Description of a request-serving system to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// Arrival rate (lambda)
    pub requests_per_second: f64,
    /// Mean service time per request
    pub average_latency_ms: f64,
    /// Number of concurrent workers
    pub thread_pool_size: u32,
    /// Maximum pending-request buffer
    pub queue_size: u32,
    /// Informational only, not used by any formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,
    /// Desired safe-operating ceiling as a percentage of thread capacity
    pub target_utilization_pct: f64,
    /// Latency at which a request is considered timed out
    pub timeout_threshold_ms: f64,
}

/// Scalar metrics derived from a single input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMetrics {
    pub concurrency_required: f64,
    pub utilization_ratio: f64,
    pub utilization_pct: f64,
    pub queue_pressure: f64,
    pub throughput_limit: f64,
    pub saturation_probability: f64,
}

/// Dominant bottleneck of the evaluated system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckClassification {
    Healthy,
    ThreadPoolSaturation,
    QueueSaturation,
    TimeoutRisk,
    SystemOverload,
}

impl BottleneckClassification {
    pub const ALL: [BottleneckClassification; 5] = [
        BottleneckClassification::Healthy,
        BottleneckClassification::ThreadPoolSaturation,
        BottleneckClassification::QueueSaturation,
        BottleneckClassification::TimeoutRisk,
        BottleneckClassification::SystemOverload,
    ];

    /// Wire name, also used as a metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            BottleneckClassification::Healthy => "healthy",
            BottleneckClassification::ThreadPoolSaturation => "thread_pool_saturation",
            BottleneckClassification::QueueSaturation => "queue_saturation",
            BottleneckClassification::TimeoutRisk => "timeout_risk",
            BottleneckClassification::SystemOverload => "system_overload",
        }
    }
}

impl std::fmt::Display for BottleneckClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal risk that the request queue grows without bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueExplosionRisk {
    Low,
    Medium,
    High,
}

impl QueueExplosionRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueExplosionRisk::Low => "low",
            QueueExplosionRisk::Medium => "medium",
            QueueExplosionRisk::High => "high",
        }
    }
}

impl std::fmt::Display for QueueExplosionRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed-form sizing advice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalingAdvisor {
    pub current_service_rate_rps: f64,
    pub traffic_intensity: f64,
    /// `None` when the queueing model does not apply (rho >= 1)
    pub estimated_queue_wait_ms: Option<f64>,
    pub recommended_thread_pool_size: u64,
    pub estimated_min_instances: u64,
}

/// Fully-derived result of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutput {
    pub input: SimulationInput,
    pub metrics: SimulationMetrics,
    pub bottleneck: BottleneckClassification,
    pub queue_explosion_risk: QueueExplosionRisk,
    pub autoscaling_advisor: AutoscalingAdvisor,
    pub scaling_recommendation: String,
    pub warnings: Vec<String>,
}

/// Request body for saving a named scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScenarioRequest {
    pub name: String,
    pub input: SimulationInput,
}

/// A stored `(input, output)` pair with a name and creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub input: SimulationInput,
    pub output: SimulationOutput,
}

/// JSON error body shared by the service and its clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}
