//! API client for communicating with the capacity planner service

use anyhow::{Context, Result};
use planner_lib::{
    CreateScenarioRequest, ErrorResponse, ScenarioRecord, SimulationInput, SimulationOutput,
};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// API client for the capacity planner service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::check(response)
            .await?
            .json()
            .await
            .context("Failed to parse response")
    }

    /// Make a DELETE request, expecting no body
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::check(response).await?;
        Ok(())
    }

    /// Turn a non-success response into an error carrying the service's message
    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => match error.details {
                Some(details) if !details.is_empty() => {
                    format!("{}: {}", error.error, details.join("; "))
                }
                _ => error.error,
            },
            Err(_) => body,
        };

        anyhow::bail!("API error ({}): {}", status, message);
    }

    pub async fn simulate(&self, input: &SimulationInput) -> Result<SimulationOutput> {
        self.post("api/simulate", input).await
    }

    pub async fn list_scenarios(&self) -> Result<Vec<ScenarioRecord>> {
        self.get("api/scenarios").await
    }

    pub async fn get_scenario(&self, id: i64) -> Result<ScenarioRecord> {
        self.get(&format!("api/scenarios/{}", id)).await
    }

    pub async fn create_scenario(&self, request: &CreateScenarioRequest) -> Result<ScenarioRecord> {
        self.post("api/scenarios", request).await
    }

    pub async fn delete_scenario(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/scenarios/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_lib::evaluate;

    fn sample_input() -> SimulationInput {
        SimulationInput {
            requests_per_second: 100.0,
            average_latency_ms: 200.0,
            thread_pool_size: 40,
            queue_size: 500,
            cpu_cores: None,
            target_utilization_pct: 80.0,
            timeout_threshold_ms: 2000.0,
        }
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_simulate_posts_input() {
        let mut server = mockito::Server::new_async().await;
        let output = evaluate(&sample_input());

        let mock = server
            .mock("POST", "/api/simulate")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "requestsPerSecond": 100.0,
                "threadPoolSize": 40
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&output).unwrap())
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result = client.simulate(&sample_input()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.bottleneck, output.bottleneck);
        assert_eq!(result.warnings, output.warnings);
    }

    #[tokio::test]
    async fn test_error_response_details_are_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/simulate")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Invalid input","details":["queueSize must be at most 1000000"]}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.simulate(&sample_input()).await.unwrap_err();
        let message = err.to_string();

        assert!(message.contains("400"));
        assert!(message.contains("Invalid input: queueSize must be at most 1000000"));
    }

    #[tokio::test]
    async fn test_delete_scenario() {
        let mut server = mockito::Server::new_async().await;
        let deleted = server
            .mock("DELETE", "/api/scenarios/7")
            .with_status(204)
            .create_async()
            .await;
        server
            .mock("DELETE", "/api/scenarios/8")
            .with_status(404)
            .with_body(r#"{"error":"Scenario not found"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        client.delete_scenario(7).await.unwrap();
        deleted.assert_async().await;

        let err = client.delete_scenario(8).await.unwrap_err();
        assert!(err.to_string().contains("Scenario not found"));
    }
}
