//! HTTP API for evaluation, scenario storage, health checks and metrics

use crate::error::ApiError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use planner_lib::{
    evaluate,
    health::{check_health, ComponentStatus},
    observability::{PlannerMetrics, StructuredLogger},
    scenario::ScenarioRepository,
    validate_input, validate_scenario_request, CreateScenarioRequest, ScenarioRecord,
    SimulationInput, SimulationOutput,
};
use prometheus::{Encoder, TextEncoder};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScenarioRepository>,
    pub metrics: PlannerMetrics,
    pub logger: StructuredLogger,
    pub scenario_list_limit: u32,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ScenarioRepository>,
        metrics: PlannerMetrics,
        logger: StructuredLogger,
        scenario_list_limit: u32,
    ) -> Self {
        Self {
            store,
            metrics,
            logger,
            scenario_list_limit,
        }
    }

    /// Evaluate already-validated input and record it
    fn evaluate(&self, input: &SimulationInput, source: &str) -> SimulationOutput {
        let started = Instant::now();
        let output = evaluate(input);
        self.metrics
            .observe_simulation(started.elapsed().as_secs_f64(), &output);
        self.logger.log_simulation(&output, source);
        output
    }

    fn reject(&self, source: &str, details: &[String]) {
        self.metrics.inc_validation_failures();
        self.logger.log_validation_failure(source, details);
    }
}

/// Health check response - returns 200 if operational, 503 otherwise
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = check_health(state.store.as_ref()).await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// POST /api/simulate
async fn simulate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimulationInput>, JsonRejection>,
) -> Result<Json<SimulationOutput>, ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        let details = vec![rejection.body_text()];
        state.reject("simulate", &details);
        ApiError::InvalidInput(details)
    })?;

    if let Err(e) = validate_input(&input) {
        state.reject("simulate", &e.details);
        return Err(ApiError::InvalidInput(e.details));
    }

    Ok(Json(state.evaluate(&input, "simulate")))
}

/// GET /api/scenarios
async fn list_scenarios(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ScenarioRecord>>, ApiError> {
    let scenarios = state.store.list(state.scenario_list_limit).await?;
    Ok(Json(scenarios))
}

/// POST /api/scenarios
async fn create_scenario(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateScenarioRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScenarioRecord>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let details = vec![rejection.body_text()];
        state.reject("create_scenario", &details);
        ApiError::InvalidScenario(details)
    })?;

    if let Err(e) = validate_scenario_request(&request) {
        state.reject("create_scenario", &e.details);
        return Err(ApiError::InvalidScenario(e.details));
    }

    let name = request.name.trim();
    let output = state.evaluate(&request.input, "create_scenario");
    let record = state.store.create(name, &request.input, &output).await?;

    state.metrics.inc_scenarios_saved();
    state
        .logger
        .log_scenario_saved(record.id, &record.name, &record.output);

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/scenarios/:id
async fn get_scenario(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<ScenarioRecord>, ApiError> {
    let id = parse_scenario_id(&raw_id)?;
    let record = state
        .store
        .get(id)
        .await?
        .ok_or(ApiError::ScenarioNotFound)?;
    Ok(Json(record))
}

/// DELETE /api/scenarios/:id
async fn delete_scenario(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_scenario_id(&raw_id)?;
    if !state.store.delete(id).await? {
        return Err(ApiError::ScenarioNotFound);
    }

    state.metrics.inc_scenarios_deleted();
    state.logger.log_scenario_deleted(id);
    Ok(StatusCode::NO_CONTENT)
}

/// Scenario ids are positive integers
fn parse_scenario_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidScenarioId),
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    ApiError::RouteNotFound {
        method: method.to_string(),
        path,
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/simulate", post(simulate))
        .route("/scenarios", get(list_scenarios).post(create_scenario))
        .route("/scenarios/:id", get(get_scenario).delete(delete_scenario));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario_id() {
        assert_eq!(parse_scenario_id("42").unwrap(), 42);
        assert!(matches!(
            parse_scenario_id("0"),
            Err(ApiError::InvalidScenarioId)
        ));
        assert!(parse_scenario_id("-3").is_err());
        assert!(parse_scenario_id("1.5").is_err());
        assert!(parse_scenario_id("abc").is_err());
    }
}
