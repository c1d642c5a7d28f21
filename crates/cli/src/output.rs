//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use planner_lib::{BottleneckClassification, QueueExplosionRisk, SimulationOutput};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for key/value detail tables
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render a table with the CLI's border style
pub fn render_table<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn color_bottleneck(bottleneck: BottleneckClassification) -> String {
    let label = bottleneck.as_str();
    match bottleneck {
        BottleneckClassification::Healthy => label.green().to_string(),
        BottleneckClassification::TimeoutRisk | BottleneckClassification::QueueSaturation => {
            label.yellow().to_string()
        }
        BottleneckClassification::ThreadPoolSaturation => label.red().to_string(),
        BottleneckClassification::SystemOverload => label.red().bold().to_string(),
    }
}

pub fn color_risk(risk: QueueExplosionRisk) -> String {
    let label = risk.as_str();
    match risk {
        QueueExplosionRisk::Low => label.green().to_string(),
        QueueExplosionRisk::Medium => label.yellow().to_string(),
        QueueExplosionRisk::High => label.red().to_string(),
    }
}

/// Queue wait in ms, or `n/a` where the queueing model does not apply
pub fn format_queue_wait(wait_ms: Option<f64>) -> String {
    match wait_ms {
        Some(ms) => format!("{:.2} ms", ms),
        None => "n/a".to_string(),
    }
}

/// Ratio as a percentage with two decimals
pub fn format_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Print a full evaluation result as tables
pub fn print_simulation(output: &SimulationOutput) {
    let metrics = &output.metrics;
    let advisor = &output.autoscaling_advisor;

    println!("{}", "Verdict".bold());
    let verdict = vec![
        FieldRow {
            field: "Bottleneck",
            value: color_bottleneck(output.bottleneck),
        },
        FieldRow {
            field: "Queue explosion risk",
            value: color_risk(output.queue_explosion_risk),
        },
    ];
    println!("{}", render_table(&verdict));

    println!();
    println!("{}", "Metrics".bold());
    let rows = vec![
        FieldRow {
            field: "Concurrency required",
            value: format!("{:.2}", metrics.concurrency_required),
        },
        FieldRow {
            field: "Utilization",
            value: format!("{:.2}%", metrics.utilization_pct),
        },
        FieldRow {
            field: "Queue pressure",
            value: format!("{:.2}", metrics.queue_pressure),
        },
        FieldRow {
            field: "Throughput limit",
            value: format!("{:.2} rps", metrics.throughput_limit),
        },
        FieldRow {
            field: "Saturation probability",
            value: format_pct(metrics.saturation_probability),
        },
    ];
    println!("{}", render_table(&rows));

    println!();
    println!("{}", "Autoscaling advisor".bold());
    let rows = vec![
        FieldRow {
            field: "Service rate",
            value: format!("{:.2} rps", advisor.current_service_rate_rps),
        },
        FieldRow {
            field: "Traffic intensity",
            value: format!("{:.3}", advisor.traffic_intensity),
        },
        FieldRow {
            field: "Estimated queue wait",
            value: format_queue_wait(advisor.estimated_queue_wait_ms),
        },
        FieldRow {
            field: "Recommended threads",
            value: advisor.recommended_thread_pool_size.to_string(),
        },
        FieldRow {
            field: "Minimum instances",
            value: advisor.estimated_min_instances.to_string(),
        },
    ];
    println!("{}", render_table(&rows));

    println!();
    print_info(&output.scaling_recommendation);
    for warning in &output.warnings {
        print_warning(warning);
    }
}
