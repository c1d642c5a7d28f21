//! Service configuration

use anyhow::Result;
use serde::Deserialize;

/// Environment variable naming an optional configuration file
pub const CONFIG_FILE_ENV: &str = "PLANNER_CONFIG";

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Listen address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx connection URL for scenario storage
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Maximum number of records returned by a scenario listing
    #[serde(default = "default_scenario_list_limit")]
    pub scenario_list_limit: u32,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "capacity-planner".to_string())
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4300
}

fn default_database_url() -> String {
    "sqlite://data/simulations.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_scenario_list_limit() -> u32 {
    planner_lib::scenario::DEFAULT_LIST_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            bind_address: default_bind_address(),
            port: default_port(),
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            scenario_list_limit: default_scenario_list_limit(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the optional file in `PLANNER_CONFIG`, then
    /// `PLANNER_*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(std::env::var(CONFIG_FILE_ENV).ok().as_deref())
    }

    pub fn load_from(file: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("PLANNER").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// `bind_address:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 4300);
        assert_eq!(config.database_url, "sqlite://data/simulations.db");
        assert_eq!(config.scenario_list_limit, 100);
        assert_eq!(config.listen_addr(), "0.0.0.0:4300");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "port = 8088").unwrap();
        writeln!(file, "database_url = \"sqlite::memory:\"").unwrap();
        writeln!(file, "scenario_list_limit = 10").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = ServerConfig::load_from(Some(&path)).unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.scenario_list_limit, 10);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ServerConfig::load_from(Some("/nonexistent/planner.toml")).is_err());
    }
}
