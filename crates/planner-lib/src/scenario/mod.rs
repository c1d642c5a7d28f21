//! Named scenario persistence and comparison
//!
//! A scenario stores an `(input, output)` pair verbatim together with a
//! name and creation timestamp. Storage is behind [`ScenarioRepository`] so
//! the HTTP layer never depends on a concrete database handle.

mod comparison;
mod store;

pub use comparison::{MetricDelta, ScenarioComparison, Transition};
pub use store::{database_file, SqliteScenarioStore, DEFAULT_LIST_LIMIT};

use crate::models::{ScenarioRecord, SimulationInput, SimulationOutput};
use async_trait::async_trait;
use thiserror::Error;

/// Result alias for scenario storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by scenario storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize scenario: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored scenario {id} is corrupt: {source}")]
    Deserialize {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage for named scenarios
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Store a new scenario and return it with its assigned id
    async fn create(
        &self,
        name: &str,
        input: &SimulationInput,
        output: &SimulationOutput,
    ) -> StoreResult<ScenarioRecord>;

    /// Fetch a single scenario
    async fn get(&self, id: i64) -> StoreResult<Option<ScenarioRecord>>;

    /// Most recently created scenarios first
    async fn list(&self, limit: u32) -> StoreResult<Vec<ScenarioRecord>>;

    /// Remove a scenario, returning whether it existed
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}
