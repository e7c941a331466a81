use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use client_core::{OrchestratorConfig, ProjectionOrchestrator};
use gemini_integration::GeminiConfig;
use projection::{default_params, derive_seed, synthesize, CurveParams};
use shared::domain::{ExternalPointPolicy, ProjectionPoint};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "projection-tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full source fallback chain for a topic.
    Project {
        topic: String,
        #[arg(long, env = "GROWTH_API_URL")]
        growth_url: Option<String>,
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Show live points as returned instead of anchoring a curve on them.
        #[arg(long)]
        verbatim: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print a synthesized curve, optionally with explicit parameters.
    Curve {
        topic: String,
        #[arg(long)]
        start_year: Option<i32>,
        #[arg(long)]
        span: Option<usize>,
        #[arg(long)]
        start_value: Option<f64>,
        #[arg(long)]
        target: Option<f64>,
    },
    Seed {
        topic: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Project {
            topic,
            growth_url,
            api_key,
            verbatim,
            json,
        } => {
            let config = OrchestratorConfig {
                growth_api_url: growth_url,
                gemini: api_key
                    .filter(|key| !key.trim().is_empty())
                    .map(GeminiConfig::new),
                policy: if verbatim {
                    ExternalPointPolicy::Verbatim
                } else {
                    ExternalPointPolicy::AnchorAndExtend
                },
                ..OrchestratorConfig::default()
            };
            let orchestrator = ProjectionOrchestrator::from_config(config)?;
            let projection = orchestrator.project(&topic).await;

            if json {
                let rendered = serde_json::to_string_pretty(&projection)
                    .context("failed to encode projection")?;
                println!("{rendered}");
                return Ok(());
            }

            println!(
                "topic={} source={}",
                projection.topic,
                projection.source.as_str()
            );
            if let Some(advisory) = &projection.advisory {
                println!("note: {advisory}");
            }
            print_points(&projection.series);
            let summary = &projection.summary;
            println!(
                "delta={} velocity={}/yr multiple={}x horizon={} since={}",
                summary.delta,
                summary.velocity,
                summary.multiple,
                summary.horizon,
                summary.start_year
            );
        }
        Command::Curve {
            topic,
            start_year,
            span,
            start_value,
            target,
        } => {
            let defaults = default_params(&topic, Utc::now().year());
            let params = CurveParams {
                start_year: start_year.unwrap_or(defaults.start_year),
                span: span.unwrap_or(defaults.span),
                start_value: start_value.unwrap_or(defaults.start_value),
                target_value: target.unwrap_or(defaults.target_value),
            };
            print_points(&synthesize(&topic, &params));
        }
        Command::Seed { topic } => {
            println!("{}", derive_seed(&topic));
        }
    }

    Ok(())
}

fn print_points(points: &[ProjectionPoint]) {
    for point in points {
        match &point.milestone {
            Some(milestone) => println!("{}\t{}\t{milestone}", point.year, point.advancement),
            None => println!("{}\t{}", point.year, point.advancement),
        }
    }
}
