mod smoke;

use clap::{Parser, Subcommand};
use revcount_core::{AppConfig, CanonicalDate, DateListResult, ExtractionResult, StrategyMode};
use revcount_scraper::ExtractionOrchestrator;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "revcount-cli")]
#[command(about = "Count restaurant visitor reviews per day")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract and aggregate review dates for a place
    Count {
        /// Place identifier as it appears in the review URL
        place_id: String,
        /// Print only the count for this day (M.D, e.g. 8.8)
        #[arg(long)]
        date: Option<CanonicalDate>,
        /// Override `REVCOUNT_STRATEGY` (markup or rendered)
        #[arg(long)]
        strategy: Option<StrategyMode>,
    },
    /// List the raw date tokens found for a place
    Dates {
        place_id: String,
        #[arg(long)]
        strategy: Option<StrategyMode>,
    },
    /// Exercise every endpoint of a running server
    Smoke {
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,
        #[arg(long, default_value = smoke::DEFAULT_PLACE_ID)]
        place_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Count {
            place_id,
            date,
            strategy,
        } => {
            let config = load_config()?;
            let orchestrator =
                ExtractionOrchestrator::with_mode(&config, strategy.unwrap_or(config.strategy))?;
            run_count(&orchestrator, &place_id, date).await
        }
        Commands::Dates { place_id, strategy } => {
            let config = load_config()?;
            let orchestrator =
                ExtractionOrchestrator::with_mode(&config, strategy.unwrap_or(config.strategy))?;
            run_dates(&orchestrator, &place_id).await
        }
        Commands::Smoke { base_url, place_id } => {
            // The smoke check talks to a remote server and never reads the
            // extraction settings.
            init_tracing("info")?;
            run_smoke(&base_url, &place_id).await
        }
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = revcount_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    Ok(config)
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn run_smoke(base_url: &str, place_id: &str) -> anyhow::Result<()> {
    let report = smoke::run(base_url, place_id).await?;
    report.print();
    if report.all_passed() {
        Ok(())
    } else {
        anyhow::bail!("{} of {} smoke checks failed", report.failed(), report.total())
    }
}

async fn run_count(
    orchestrator: &ExtractionOrchestrator,
    place_id: &str,
    date: Option<CanonicalDate>,
) -> anyhow::Result<()> {
    if let Some(date) = date {
        let count = orchestrator
            .fetch_and_count(place_id, date)
            .await
            .map_err(|f| anyhow::anyhow!("extraction failed for {}: {}", f.place_id, f.error))?;
        println!("{count}");
        return Ok(());
    }

    let result = orchestrator.fetch_and_aggregate(place_id).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    match result {
        ExtractionResult::Success(_) => Ok(()),
        ExtractionResult::Failure(f) => anyhow::bail!("extraction failed: {}", f.error),
    }
}

async fn run_dates(orchestrator: &ExtractionOrchestrator, place_id: &str) -> anyhow::Result<()> {
    let result = orchestrator.fetch_dates(place_id).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    match result {
        DateListResult::Success(_) => Ok(()),
        DateListResult::Failure(f) => anyhow::bail!("extraction failed: {}", f.error),
    }
}

#[cfg(test)]
mod tests;
