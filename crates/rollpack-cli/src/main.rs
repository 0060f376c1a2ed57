use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rollpack_core::scale::to_meters;
use rollpack_core::{
    ComparisonReport, GapPolicy, HeuristicKind, LayoutSummary, PackError, PlanRequest, Planner,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollpack")]
#[command(about = "Roll packing planner - lay out canvas pieces on fixed-width rolls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every heuristic on every container
    Compare {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack with one heuristic on one roll width
    Pack {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Roll width in meters; defaults to the first container's
        #[arg(short, long)]
        width: Option<f64>,

        /// guillotine-bssf, largest-first, narrow, grouped or gap-fill
        #[arg(long, default_value = "guillotine-bssf")]
        heuristic: HeuristicKind,

        /// Spacing in meters; defaults to the request's production gap
        #[arg(short, long)]
        gap: Option<f64>,

        /// Output file for the layout (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare { input, output } => {
            compare_command(&input, output)?;
        }
        Commands::Pack {
            input,
            width,
            heuristic,
            gap,
            output,
        } => {
            pack_command(&input, width, heuristic, gap, output)?;
        }
    }

    Ok(())
}

fn load_request(input: &Path) -> Result<PlanRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let request: PlanRequest = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    debug!(path = %input.display(), "request loaded");

    Ok(request)
}

fn compare_command(input: &Path, output: Option<PathBuf>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());
    let request = load_request(input)?;

    println!(
        "  {} pieces, {} containers",
        request.pieces.len().to_string().bright_white().bold(),
        request.containers.len().to_string().bright_white().bold()
    );
    println!();

    let planner = Planner::new(request)?;
    println!("{}", "🚀 Comparing heuristics...".bright_blue());

    let comparison = match planner.compare() {
        Ok(comparison) => comparison,
        Err(PackError::NoFeasibleLayout) => {
            println!("{}", "❌ No feasible layout for the selected pieces".bright_red().bold());
            return Err(PackError::NoFeasibleLayout.into());
        }
        Err(err) => return Err(err.into()),
    };
    let report = planner.report(&comparison);

    println!();
    print_report(&report);
    println!();

    write_json(&report, output)
}

fn pack_command(
    input: &Path,
    width: Option<f64>,
    heuristic: HeuristicKind,
    gap: Option<f64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let request = load_request(input)?;
    let planner = Planner::new(request)?;

    let width = match width {
        Some(width) => width,
        None => planner
            .containers()
            .first()
            .map(|c| to_meters(c.single_roll_width))
            .context("no container to take a roll width from")?,
    };

    println!(
        "{} {} on a {} m roll",
        "🚀 Packing with".bright_blue(),
        heuristic.display_name().bright_white().bold(),
        width
    );

    let result = planner.pack(width, heuristic, gap)?;
    let summary = planner.summarize(&result, None);

    println!();
    print_layout(&summary);
    println!();

    write_json(&summary, output)
}

fn print_report(report: &ComparisonReport) {
    println!("{}", "📊 Results (production gap):".bright_yellow().bold());

    for row in report
        .rows
        .iter()
        .filter(|row| row.gap_policy == GapPolicy::Production)
    {
        let zero_gap = report.rows.iter().find(|other| {
            other.gap_policy == GapPolicy::Zero
                && other.container_id == row.container_id
                && other.heuristic == row.heuristic
                && other.layout.joined_roll_count == row.layout.joined_roll_count
        });

        let marker = if row.is_best { "★".bright_green().bold() } else { " ".normal() };
        let roll = if row.layout.joined_roll_count > 1 {
            format!("{} x {} m", row.layout.joined_roll_count, row.layout.single_roll_width)
        } else {
            format!("{} m", row.layout.roll_width)
        };

        println!(
            "  {} {:<16} {:<10} {:<12} {:>8.2} m  {:>6.2}%{}",
            marker,
            row.algorithm,
            row.container_id,
            roll,
            row.layout.total_length,
            row.layout.efficiency_pct,
            zero_gap
                .map(|z| format!("  (no gap {:.2}%)", z.layout.efficiency_pct))
                .unwrap_or_default()
        );

        if row.skipped_count > 0 {
            println!(
                "      {} {}",
                "does not fit:".bright_red(),
                row.skipped_ids.join(", ")
            );
        }
    }

    println!();
    if let Some(best) = report.best() {
        println!(
            "{} {} on {} ({:.2}%, {} of {} pieces)",
            "✅ Best:".bright_green().bold(),
            best.algorithm.bright_white().bold(),
            best.container_id.bright_white(),
            best.layout.efficiency_pct,
            best.fittable_count,
            report.total_selected
        );
    }
}

fn print_layout(summary: &LayoutSummary) {
    println!("{}", "📊 Layout:".bright_yellow().bold());
    println!(
        "  Length: {} m",
        format!("{:.3}", summary.total_length).bright_white().bold()
    );
    println!(
        "  Efficiency: {}%",
        format!("{:.2}", summary.efficiency_pct).bright_white().bold()
    );
    println!("  Waste: {:.3} m²", summary.waste_area);

    for item in &summary.packed_items {
        let rotated = if item.rotated { " (R)" } else { "" };
        println!(
            "    • {} at ({}, {}) {} x {}{}",
            item.id.bright_white(),
            item.x,
            item.y,
            item.width,
            item.length,
            rotated.bright_cyan()
        );
    }

    if !summary.unplaced.is_empty() {
        println!(
            "  {} {}",
            "Not placed:".bright_red(),
            summary.unplaced.join(", ")
        );
    }
}

fn write_json<T: Serialize>(value: &T, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
