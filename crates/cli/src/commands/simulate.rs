//! Evaluate a system description, remotely or in-process

use anyhow::Result;
use clap::Args;
use planner_lib::{evaluate, validate_input, SimulationInput, SimulationOutput};

use crate::client::ApiClient;
use crate::output::{print_json, print_simulation, OutputFormat};

/// System description flags shared by `simulate` and `scenarios save`
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Arrival rate in requests per second
    #[arg(long)]
    pub rps: f64,

    /// Mean service time per request in milliseconds
    #[arg(long)]
    pub latency_ms: f64,

    /// Worker thread count
    #[arg(long)]
    pub threads: u32,

    /// Maximum pending-request buffer
    #[arg(long, default_value_t = 0)]
    pub queue: u32,

    /// Target utilization as a percentage of thread capacity
    #[arg(long, default_value_t = 70.0)]
    pub target_util: f64,

    /// Timeout threshold in milliseconds
    #[arg(long)]
    pub timeout_ms: f64,

    /// CPU cores (informational)
    #[arg(long)]
    pub cpu_cores: Option<u32>,
}

impl From<InputArgs> for SimulationInput {
    fn from(args: InputArgs) -> Self {
        SimulationInput {
            requests_per_second: args.rps,
            average_latency_ms: args.latency_ms,
            thread_pool_size: args.threads,
            queue_size: args.queue,
            cpu_cores: args.cpu_cores,
            target_utilization_pct: args.target_util,
            timeout_threshold_ms: args.timeout_ms,
        }
    }
}

/// Validate and evaluate without contacting the service
pub fn evaluate_offline(input: &SimulationInput) -> Result<SimulationOutput> {
    validate_input(input)?;
    Ok(evaluate(input))
}

/// Evaluate a system description
pub async fn simulate(
    client: &ApiClient,
    args: InputArgs,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    let input = SimulationInput::from(args);

    let output = if offline {
        evaluate_offline(&input)?
    } else {
        client.simulate(&input).await?
    };

    match format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Table => print_simulation(&output),
    }

    Ok(())
}
