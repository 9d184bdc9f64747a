//! Shared vocabulary for the koyomi calendar engine: error taxonomy,
//! identifier newtypes, and configuration loading.

pub mod config;
pub mod error;
pub mod types;
