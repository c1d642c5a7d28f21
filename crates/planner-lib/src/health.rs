//! Health checks for the planner service
//!
//! Each component is probed on demand; the overall status is the worst
//! component status.

use crate::engine::evaluate;
use crate::models::{BottleneckClassification, SimulationInput};
use crate::scenario::ScenarioRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is experiencing issues but still operational
    Degraded,
    /// Component has failed
    Unhealthy,
}

impl ComponentStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, ComponentStatus::Healthy | ComponentStatus::Degraded)
    }
}

/// Information about a component's health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: ComponentStatus::Healthy,
            message: None,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ComponentStatus::Unhealthy,
            message: Some(message.into()),
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Overall health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: HashMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// Compute overall status from component statuses
    pub fn compute_status(components: &HashMap<String, ComponentHealth>) -> ComponentStatus {
        let mut has_degraded = false;

        for health in components.values() {
            match health.status {
                ComponentStatus::Unhealthy => return ComponentStatus::Unhealthy,
                ComponentStatus::Degraded => has_degraded = true,
                ComponentStatus::Healthy => {}
            }
        }

        if has_degraded {
            ComponentStatus::Degraded
        } else {
            ComponentStatus::Healthy
        }
    }

    pub fn from_components(components: HashMap<String, ComponentHealth>) -> Self {
        let status = Self::compute_status(&components);
        Self { status, components }
    }
}

/// Component names for health tracking
pub mod components {
    pub const ENGINE: &str = "engine";
    pub const SCENARIO_STORE: &str = "scenario_store";
}

/// Evaluate a known-healthy reference system and check the verdict
pub fn check_engine() -> ComponentHealth {
    let reference = SimulationInput {
        requests_per_second: 100.0,
        average_latency_ms: 200.0,
        thread_pool_size: 40,
        queue_size: 500,
        cpu_cores: None,
        target_utilization_pct: 80.0,
        timeout_threshold_ms: 2000.0,
    };

    let output = evaluate(&reference);
    if output.bottleneck == BottleneckClassification::Healthy {
        ComponentHealth::healthy()
    } else {
        ComponentHealth::unhealthy(format!(
            "reference evaluation classified as {}",
            output.bottleneck
        ))
    }
}

/// Probe the scenario store
pub async fn check_store(store: &dyn ScenarioRepository) -> ComponentHealth {
    match store.ping().await {
        Ok(()) => ComponentHealth::healthy(),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    }
}

/// Probe every component
pub async fn check_health(store: &dyn ScenarioRepository) -> HealthResponse {
    let mut components = HashMap::new();
    components.insert(components::ENGINE.to_string(), check_engine());
    components.insert(
        components::SCENARIO_STORE.to_string(),
        check_store(store).await,
    );
    HealthResponse::from_components(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::SqliteScenarioStore;

    #[test]
    fn test_compute_status_empty_is_healthy() {
        assert_eq!(
            HealthResponse::compute_status(&HashMap::new()),
            ComponentStatus::Healthy
        );
    }

    #[test]
    fn test_unhealthy_component_dominates() {
        let mut components = HashMap::new();
        components.insert("a".to_string(), ComponentHealth::healthy());
        components.insert("b".to_string(), ComponentHealth::unhealthy("down"));

        let response = HealthResponse::from_components(components);
        assert_eq!(response.status, ComponentStatus::Unhealthy);
        assert!(!response.status.is_operational());
    }

    #[test]
    fn test_engine_reference_is_healthy() {
        assert_eq!(check_engine().status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_store_probe() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        let health = check_health(&store).await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.contains_key(components::SCENARIO_STORE));

        store.close().await;
        let health = check_health(&store).await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert!(health.components[components::SCENARIO_STORE].message.is_some());
    }
}
