// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 500, 502

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("Could not find specified filing: {0}")]
    FilingDocNotFound(String),

    #[error("No filing document link on index page {0}")]
    DocumentLinkNotFound(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("No stockholder table found")]
    TableNotFound,

    #[error("Stockholder table found but no header row in {0} rows")]
    HeaderRowNotFound(usize),
}

#[derive(Error, Debug)]
pub enum CrmError {
    #[error("CRM request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CRM HTTP error: {0} for {1}")]
    Http(reqwest::StatusCode, String),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Registry HTTP error: {0}")]
    Http(reqwest::StatusCode),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError),

    #[error("CRM interaction failed: {0}")]
    Crm(#[from] CrmError),
}
