//! Capacity planner CLI
//!
//! A command-line tool for evaluating request-serving systems and managing
//! saved scenarios on a capacity planner service.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{compare, scenarios, simulate};

/// Capacity planner CLI
#[derive(Parser)]
#[command(name = "capctl")]
#[command(author, version, about = "CLI for the Capacity Planner", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via CAPCTL_API_URL env var)
    #[arg(long, env = "CAPCTL_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a system description
    Simulate {
        #[command(flatten)]
        input: simulate::InputArgs,

        /// Evaluate in-process instead of calling the service
        #[arg(long)]
        offline: bool,
    },

    /// Manage saved scenarios
    #[command(subcommand)]
    Scenarios(ScenarioCommands),

    /// Compare two saved scenarios
    Compare {
        /// Baseline scenario ID
        baseline: i64,

        /// Candidate scenario ID
        candidate: i64,
    },
}

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List saved scenarios, newest first
    List,

    /// Show a saved scenario
    Show {
        /// Scenario ID
        id: i64,
    },

    /// Evaluate and save a named scenario
    Save {
        /// Scenario name
        name: String,

        #[command(flatten)]
        input: simulate::InputArgs,
    },

    /// Delete a saved scenario
    Delete {
        /// Scenario ID
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::Config::load()?;
    let api_url = config.resolve_api_url(cli.api_url.as_deref());

    // Initialize client
    let client = client::ApiClient::new(&api_url)?;
    if cli.verbose {
        output::print_info(&format!("Using API at {}", client.base_url()));
    }

    // Execute command
    match cli.command {
        Commands::Simulate { input, offline } => {
            simulate::simulate(&client, input, offline, cli.format).await?;
        }
        Commands::Scenarios(scenario_cmd) => match scenario_cmd {
            ScenarioCommands::List => {
                scenarios::list_scenarios(&client, cli.format).await?;
            }
            ScenarioCommands::Show { id } => {
                scenarios::show_scenario(&client, id, cli.format).await?;
            }
            ScenarioCommands::Save { name, input } => {
                scenarios::save_scenario(&client, name, input, cli.format).await?;
            }
            ScenarioCommands::Delete { id } => {
                scenarios::delete_scenario(&client, id).await?;
            }
        },
        Commands::Compare {
            baseline,
            candidate,
        } => {
            compare::compare_scenarios(&client, baseline, candidate, cli.format).await?;
        }
    }

    Ok(())
}
