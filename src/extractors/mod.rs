// src/extractors/mod.rs
pub mod fields;
pub mod normalize;
pub mod stockholders;
pub mod table;
pub mod validator;

// Re-export key extraction types for convenience
pub use stockholders::{extract_stockholders, Stockholder};
