//! SQLite-backed scenario store

use super::{ScenarioRepository, StoreError, StoreResult};
use crate::models::{ScenarioRecord, SimulationInput, SimulationOutput};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Default number of scenarios returned by a listing
pub const DEFAULT_LIST_LIMIT: u32 = 100;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS scenarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    input_json TEXT NOT NULL,
    output_json TEXT NOT NULL
)
"#;

const SELECT_BY_ID: &str =
    "SELECT id, name, created_at, input_json, output_json FROM scenarios WHERE id = ?";

const SELECT_RECENT: &str =
    "SELECT id, name, created_at, input_json, output_json FROM scenarios ORDER BY id DESC LIMIT ?";

/// Scenario store over an injected sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteScenarioStore {
    pool: SqlitePool,
}

impl SqliteScenarioStore {
    /// Wrap an existing pool, creating the schema if needed
    pub async fn new(pool: SqlitePool) -> StoreResult<Self> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Open (or create) the database at `url`
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        if let Some(path) = database_file(url) {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        debug!(url = %url, "scenario store opened");
        Self::new(pool).await
    }

    /// Ephemeral store for tests
    ///
    /// Every SQLite in-memory connection is its own database, so the pool
    /// is pinned to a single connection that never expires.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        Self::new(pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn map_row(row: &SqliteRow) -> StoreResult<ScenarioRecord> {
        let id: i64 = row.try_get("id")?;
        let input_json: String = row.try_get("input_json")?;
        let output_json: String = row.try_get("output_json")?;

        let input = serde_json::from_str(&input_json)
            .map_err(|source| StoreError::Deserialize { id, source })?;
        let output = serde_json::from_str(&output_json)
            .map_err(|source| StoreError::Deserialize { id, source })?;

        Ok(ScenarioRecord {
            id,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            input,
            output,
        })
    }
}

#[async_trait]
impl ScenarioRepository for SqliteScenarioStore {
    async fn create(
        &self,
        name: &str,
        input: &SimulationInput,
        output: &SimulationOutput,
    ) -> StoreResult<ScenarioRecord> {
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let input_json = serde_json::to_string(input).map_err(StoreError::Serialize)?;
        let output_json = serde_json::to_string(output).map_err(StoreError::Serialize)?;

        let result = sqlx::query(
            "INSERT INTO scenarios (name, created_at, input_json, output_json) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(created_at.as_str())
        .bind(input_json.as_str())
        .bind(output_json.as_str())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %name, "scenario stored");

        Ok(ScenarioRecord {
            id,
            name: name.to_string(),
            created_at,
            input: input.clone(),
            output: output.clone(),
        })
    }

    async fn get(&self, id: i64) -> StoreResult<Option<ScenarioRecord>> {
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn list(&self, limit: u32) -> StoreResult<Vec<ScenarioRecord>> {
        let rows = sqlx::query(SELECT_RECENT)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM scenarios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Filesystem path behind a `sqlite:` URL, if it names a file
pub fn database_file(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use tempfile::TempDir;

    fn sample_input(rps: f64) -> SimulationInput {
        SimulationInput {
            requests_per_second: rps,
            average_latency_ms: 200.0,
            thread_pool_size: 40,
            queue_size: 500,
            cpu_cores: Some(4),
            target_utilization_pct: 80.0,
            timeout_threshold_ms: 2000.0,
        }
    }

    async fn save(store: &SqliteScenarioStore, name: &str, rps: f64) -> ScenarioRecord {
        let input = sample_input(rps);
        let output = evaluate(&input);
        store.create(name, &input, &output).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        let saved = save(&store, "baseline", 100.0).await;

        assert!(saved.id > 0);
        assert!(saved.created_at.ends_with('Z'));

        let fetched = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "baseline");
        assert_eq!(fetched.input, saved.input);
        assert_eq!(fetched.output.bottleneck, saved.output.bottleneck);
        assert_eq!(fetched.output.warnings, saved.output.warnings);
        assert_eq!(fetched.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_limit() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        let first = save(&store, "first", 100.0).await;
        let second = save(&store, "second", 200.0).await;
        let third = save(&store, "third", 300.0).await;

        let all = store.list(DEFAULT_LIST_LIMIT).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let limited = store.list(2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].name, "third");
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        let saved = save(&store, "doomed", 100.0).await;

        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
        assert!(store.get(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        let a = save(&store, "a-scenario", 100.0).await;
        store.delete(a.id).await.unwrap();
        let b = save(&store, "b-scenario", 100.0).await;

        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_file_store_survives_reconnect() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("simulations.db");
        let url = format!("sqlite://{}", path.display());

        let store = SqliteScenarioStore::connect(&url, 2).await.unwrap();
        let saved = save(&store, "persisted", 150.0).await;
        store.close().await;
        assert!(path.exists());

        let reopened = SqliteScenarioStore::connect(&url, 2).await.unwrap();
        let records = reopened.list(10).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, saved.id);
        reopened.ping().await.unwrap();
        reopened.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let store = SqliteScenarioStore::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO scenarios (name, created_at, input_json, output_json) VALUES ('bad', 'now', '{', '{}')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let err = store.list(10).await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialize { .. }));
    }

    #[test]
    fn test_database_file_parsing() {
        assert_eq!(
            database_file("sqlite://data/simulations.db"),
            Some(PathBuf::from("data/simulations.db"))
        );
        assert_eq!(
            database_file("sqlite:/var/lib/planner.db?mode=rwc"),
            Some(PathBuf::from("/var/lib/planner.db"))
        );
        assert_eq!(database_file("sqlite::memory:"), None);
    }
}
