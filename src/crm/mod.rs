// src/crm/mod.rs
pub mod client;
pub mod matcher;
pub mod models;
pub mod roster;

pub use client::AffinityClient;
pub use matcher::{RosterMatcher, DEFAULT_MATCH_THRESHOLD};
pub use models::MatchResult;
