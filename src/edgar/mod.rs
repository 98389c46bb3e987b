// src/edgar/mod.rs
pub mod client;
pub mod models;
pub mod resolver;

pub use client::EdgarClient;
pub use models::FilingDescriptor;
