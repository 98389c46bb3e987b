// src/config.rs
use crate::edgar::client::DEFAULT_USER_AGENT;
use crate::edgar::FilingDescriptor;
use crate::utils::AppError;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command Line Interface for the S-1 investor prospector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding an array of filing descriptors
    #[arg(short, long, conflicts_with = "index_url")]
    pub filings: Option<PathBuf>,

    /// Filing index page URL (single-filing mode)
    #[arg(long, requires = "company", requires = "cik", requires = "filing_date")]
    pub index_url: Option<String>,

    /// Company name for single-filing mode
    #[arg(long)]
    pub company: Option<String>,

    /// Company CIK for single-filing mode
    #[arg(long)]
    pub cik: Option<String>,

    /// Filing date (YYYY-MM-DD) for single-filing mode
    #[arg(long)]
    pub filing_date: Option<NaiveDate>,

    /// Form type for single-filing mode
    #[arg(long, default_value = "S-1")]
    pub form_type: String,

    /// Affinity API key; CRM matching is skipped without it
    #[arg(long, env = "AFFINITY_API_KEY", hide_env_values = true)]
    pub affinity_api_key: Option<String>,

    /// Name of the Affinity list to load as the roster
    #[arg(long, env = "AFFINITY_LIST_NAME", default_value = "Fundraising")]
    pub affinity_list: String,

    /// Minimum similarity (0-100) for a CRM match
    #[arg(long, env = "MATCH_THRESHOLD", default_value_t = crate::crm::DEFAULT_MATCH_THRESHOLD)]
    pub match_threshold: u8,

    /// Number of filings processed concurrently
    #[arg(long, default_value_t = crate::pipeline::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// User-Agent sent to EDGAR (SEC requires contact details)
    #[arg(long, env = "EDGAR_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Skip nonprofit registry lookups for foundations
    #[arg(long)]
    pub skip_foundations: bool,
}

/// Validated run settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub affinity_api_key: Option<String>,
    pub affinity_list: String,
    pub match_threshold: u8,
    pub concurrency: usize,
    pub enrich_foundations: bool,
}

impl TryFrom<&Args> for Config {
    type Error = AppError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        if args.match_threshold > 100 {
            return Err(AppError::Config(format!(
                "match threshold must be between 0 and 100, got {}",
                args.match_threshold
            )));
        }
        if args.concurrency == 0 {
            return Err(AppError::Config("concurrency must be at least 1".to_string()));
        }

        Ok(Self {
            user_agent: args.user_agent.clone(),
            affinity_api_key: args.affinity_api_key.clone().filter(|k| !k.trim().is_empty()),
            affinity_list: args.affinity_list.clone(),
            match_threshold: args.match_threshold,
            concurrency: args.concurrency,
            enrich_foundations: !args.skip_foundations,
        })
    }
}

/// Collects the filings to process from either the JSON file or the
/// single-filing flags.
pub fn load_filings(args: &Args) -> Result<Vec<FilingDescriptor>, AppError> {
    if let Some(path) = &args.filings {
        let raw = std::fs::read_to_string(path)?;
        let filings: Vec<FilingDescriptor> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} filing descriptors from {}", filings.len(), path.display());
        return Ok(filings);
    }

    match (&args.index_url, &args.company, &args.cik, args.filing_date) {
        (Some(index_url), Some(company), Some(cik), Some(filing_date)) => Ok(vec![FilingDescriptor {
            cik: cik.clone(),
            company_name: company.clone(),
            filing_date,
            form_type: args.form_type.clone(),
            filing_index_url: index_url.clone(),
        }]),
        _ => Err(AppError::Config(
            "provide --filings <PATH> or --index-url with --company, --cik and --filing-date".to_string(),
        )),
    }
}
