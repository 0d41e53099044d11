//! Electricity usage tracking: EcoScore scoring, a flat-file usage store and
//! static community comparisons.

pub mod community;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
pub mod usage;
