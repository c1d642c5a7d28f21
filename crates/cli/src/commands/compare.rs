//! Side-by-side comparison of two stored scenarios

use anyhow::Result;
use colored::Colorize;
use planner_lib::scenario::{MetricDelta, ScenarioComparison};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_bottleneck, color_risk, print_info, print_json, print_success, print_warning,
    render_table, OutputFormat,
};

/// Row for the metric delta table
#[derive(Tabled)]
struct DeltaRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Baseline")]
    baseline: String,
    #[tabled(rename = "Candidate")]
    candidate: String,
    #[tabled(rename = "Delta")]
    delta: String,
}

impl From<&MetricDelta> for DeltaRow {
    fn from(delta: &MetricDelta) -> Self {
        Self {
            metric: delta.metric,
            baseline: delta.formatted_baseline(),
            candidate: delta.formatted_candidate(),
            delta: delta.formatted_delta(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonReport<'a> {
    baseline_id: i64,
    candidate_id: i64,
    #[serde(flatten)]
    comparison: &'a ScenarioComparison,
}

/// Compare two stored scenarios
pub async fn compare_scenarios(
    client: &ApiClient,
    baseline_id: i64,
    candidate_id: i64,
    format: OutputFormat,
) -> Result<()> {
    let baseline = client.get_scenario(baseline_id).await?;
    let candidate = client.get_scenario(candidate_id).await?;
    let comparison = ScenarioComparison::between(&baseline.output, &candidate.output);

    if let OutputFormat::Json = format {
        return print_json(&ComparisonReport {
            baseline_id,
            candidate_id,
            comparison: &comparison,
        });
    }

    println!(
        "{} {} {} {}",
        "Comparing".bold(),
        format!("#{} '{}'", baseline.id, baseline.name).cyan(),
        "→".bold(),
        format!("#{} '{}'", candidate.id, candidate.name).cyan()
    );
    println!();

    let rows: Vec<DeltaRow> = comparison.metrics.iter().map(DeltaRow::from).collect();
    println!("{}", render_table(&rows));
    println!();

    let bottleneck = &comparison.bottleneck;
    println!(
        "Bottleneck:     {} → {}",
        color_bottleneck(bottleneck.from),
        color_bottleneck(bottleneck.to)
    );
    let risk = &comparison.queue_explosion_risk;
    println!(
        "Queue risk:     {} → {}",
        color_risk(risk.from),
        color_risk(risk.to)
    );
    println!();

    if comparison.is_unchanged_classification() {
        print_info("Classification unchanged");
    } else if comparison.scaling_recommendation.changed() {
        print_info(&comparison.scaling_recommendation.to);
    }

    for warning in &comparison.introduced_warnings {
        print_warning(&format!("introduced: {}", warning));
    }
    for warning in &comparison.resolved_warnings {
        print_success(&format!("resolved: {}", warning));
    }

    Ok(())
}
