//! Pension Forecast CLI
//!
//! Command-line interface for projections, inflation forecasts, tier
//! classification and batch runs

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use pension_forecast::{
    artifacts::{artifacts_dir_from_env, ModelArtifacts},
    profile::load_requests,
    projection::DisplayJitter,
    scenario::write_batch_csv,
    PensionRecord, PensionRequest, ProjectionConfig, ProjectionOrchestrator, ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "pension_forecast", version, about = "Pension projection and inflation forecasting")]
struct Cli {
    /// Model artifacts directory (defaults to $PENSION_ARTIFACTS_DIR or data/model)
    #[arg(long, global = true)]
    artifacts: Option<PathBuf>,

    /// Apply the random display jitter to pension figures
    #[arg(long, global = true)]
    jitter: bool,

    /// Calendar year to treat as the current year
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project a single request read from a JSON file
    Project { request: PathBuf },
    /// Forecast annual inflation for the coming years
    Forecast {
        #[arg(long, default_value_t = 10)]
        years: usize,
    },
    /// Classify a pension-tier record read from a JSON file
    Classify { record: PathBuf },
    /// Project every request of a CSV file
    Batch {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let artifacts_dir = cli.artifacts.clone().unwrap_or_else(artifacts_dir_from_env);
    let artifacts = ModelArtifacts::load_from(&artifacts_dir)?;
    let forecaster = artifacts.inflation_forecaster()?;
    let classifier = artifacts.tier_classifier()?;

    let mut config = ProjectionConfig::from_env();
    if cli.jitter {
        config.display_jitter = Some(DisplayJitter::default());
    }
    config.reference_year = cli.year;

    let orchestrator = ProjectionOrchestrator::new(config).with_forecaster(forecaster.clone());

    match cli.command {
        Command::Project { request } => {
            let text = fs::read_to_string(&request)
                .with_context(|| format!("reading {}", request.display()))?;
            let request: PensionRequest = serde_json::from_str(&text)?;
            let response = orchestrator
                .orchestrate(&request)
                .with_context(|| format!("projecting request '{}'", request.user_id))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Forecast { years } => {
            let first_year = forecaster.last_year().map(|y| y + 1);
            println!("{:>6} {:>10}", "Year", "Inflation");
            println!("{}", "-".repeat(17));
            for (i, rate) in forecaster.forecast(years).enumerate() {
                match first_year {
                    Some(year) => println!("{:>6} {:>9.2}%", year + i as i32, rate),
                    None => println!("{:>6} {:>9.2}%", i + 1, rate),
                }
            }
        }
        Command::Classify { record } => {
            let text = fs::read_to_string(&record)
                .with_context(|| format!("reading {}", record.display()))?;
            let record: PensionRecord = serde_json::from_str(&text)?;
            let tier = classifier.classify(&record)?;
            println!("Predicted pension category: {:?}", tier);
        }
        Command::Batch { input, output } => {
            let requests = load_requests(&input).map_err(|e| anyhow!("loading {}: {}", input.display(), e))?;
            let runner = ScenarioRunner::new(orchestrator);
            let mut responses = Vec::with_capacity(requests.len());
            for (request, result) in requests.iter().zip(runner.run_batch(&requests)) {
                match result {
                    Ok(response) => responses.push(response),
                    Err(e) => log::warn!("Skipping request '{}': {}", request.user_id, e),
                }
            }

            let written = match &output {
                Some(path) => write_batch_csv(File::create(path)?, &responses),
                None => write_batch_csv(io::stdout().lock(), &responses),
            };
            written.map_err(|e| anyhow!("writing results: {}", e))?;

            if let Some(path) = output {
                println!("Projected {} requests, results written to: {}", responses.len(), path.display());
            }
        }
    }

    Ok(())
}
