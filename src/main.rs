// src/main.rs
mod config;
mod crm;
mod edgar;
mod extractors;
mod foundations;
mod investors;
mod pipeline;
mod utils;

use clap::Parser;
use config::{Args, Config};
use crm::{AffinityClient, RosterMatcher};
use edgar::EdgarClient;
use foundations::FoundationRegistry;
use pipeline::ExtractionPipeline;
use std::io::Write;
use std::sync::Arc;
use utils::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments and validate settings
    let args = Args::parse();
    tracing::info!("Starting S-1 Prospector run");
    let config = Config::try_from(&args)?;
    tracing::debug!("Run configuration: {:?}", Config { affinity_api_key: None, ..config.clone() });

    // 3. Filing descriptors from the discovery step
    let filings = config::load_filings(&args)?;
    tracing::info!("Processing {} filings", filings.len());

    // 4. Build the pipeline
    let edgar = EdgarClient::new(&config.user_agent)?;
    let mut pipeline = ExtractionPipeline::new(edgar, config.concurrency);

    match &config.affinity_api_key {
        Some(api_key) => {
            let affinity = AffinityClient::new(api_key)?;
            match affinity.load_roster(&config.affinity_list).await {
                Ok(roster) => {
                    let matcher = RosterMatcher::new(Arc::new(roster), config.match_threshold);
                    pipeline = pipeline.with_matcher(matcher);
                }
                Err(e) => tracing::error!("Failed to load CRM roster, matching disabled: {}", e),
            }
        }
        None => tracing::warn!("No Affinity API key found - CRM matching will be skipped"),
    }

    if config.enrich_foundations {
        match FoundationRegistry::new() {
            Ok(registry) => pipeline = pipeline.with_registry(registry),
            Err(e) => tracing::warn!("Foundation registry unavailable: {}", e),
        }
    }

    // 5. Run and hand the records to stdout
    let records = pipeline.run(filings).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &records)?;
    writeln!(stdout)?;

    tracing::info!("Run complete. Emitted {} investor records.", records.len());
    Ok(())
}
