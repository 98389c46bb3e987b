// src/investors/mod.rs
pub mod classify;
pub mod record;

pub use classify::EntityType;
pub use record::{FilingRef, InvestorRecord};
