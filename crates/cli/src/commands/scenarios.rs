//! Scenario management commands

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use planner_lib::{validate_scenario_request, CreateScenarioRequest, ScenarioRecord};
use tabled::Tabled;

use crate::client::ApiClient;
use crate::commands::simulate::InputArgs;
use crate::output::{
    color_bottleneck, color_risk, print_json, print_simulation, print_success, print_warning,
    render_table, OutputFormat,
};

/// Row for scenario listings
#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Bottleneck")]
    bottleneck: String,
    #[tabled(rename = "Queue Risk")]
    risk: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Warnings")]
    warnings: usize,
}

impl From<&ScenarioRecord> for ScenarioRow {
    fn from(record: &ScenarioRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            created_at: format_timestamp(&record.created_at),
            bottleneck: color_bottleneck(record.output.bottleneck),
            risk: color_risk(record.output.queue_explosion_risk),
            utilization: format!("{:.1}%", record.output.metrics.utilization_pct),
            warnings: record.output.warnings.len(),
        }
    }
}

/// Render an RFC 3339 timestamp in local time, or as-is if it does not parse
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// List stored scenarios, newest first
pub async fn list_scenarios(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let scenarios = client.list_scenarios().await?;

    match format {
        OutputFormat::Json => print_json(&scenarios)?,
        OutputFormat::Table => {
            if scenarios.is_empty() {
                print_warning("No scenarios found");
                return Ok(());
            }
            let rows: Vec<ScenarioRow> = scenarios.iter().map(ScenarioRow::from).collect();
            println!("{}", render_table(&rows));
            println!("Total: {} scenario(s)", scenarios.len());
        }
    }

    Ok(())
}

/// Show one stored scenario with its full evaluation
pub async fn show_scenario(client: &ApiClient, id: i64, format: OutputFormat) -> Result<()> {
    let record = client.get_scenario(id).await?;

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Table => {
            println!(
                "{} {} ({})",
                format!("#{}", record.id).cyan(),
                record.name.bold(),
                format_timestamp(&record.created_at)
            );
            println!();
            print_simulation(&record.output);
        }
    }

    Ok(())
}

/// Evaluate and store a named scenario
pub async fn save_scenario(
    client: &ApiClient,
    name: String,
    args: InputArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = CreateScenarioRequest {
        name,
        input: args.into(),
    };
    validate_scenario_request(&request)?;

    let record = client.create_scenario(&request).await?;

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Table => {
            print_success(&format!(
                "Saved scenario #{} '{}' ({})",
                record.id,
                record.name,
                color_bottleneck(record.output.bottleneck)
            ));
        }
    }

    Ok(())
}

/// Delete a stored scenario
pub async fn delete_scenario(client: &ApiClient, id: i64) -> Result<()> {
    client.delete_scenario(id).await?;
    print_success(&format!("Deleted scenario #{}", id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_falls_back_to_raw() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_timestamp_parses_rfc3339() {
        let formatted = format_timestamp("2024-03-01T12:30:45.123Z");
        assert_eq!(formatted.len(), "2024-03-01 12:30:45".len());
        assert!(formatted.starts_with("2024-0"));
    }
}
