//! Endpoint, query shape, and fallback configuration

#[expect(clippy::module_inception, reason = "Mirrors the file name users see in error messages")]
mod config;

pub use config::{AnalyticsConfig, Config, DEFAULT_CONFIG_YAML, Fallbacks, RecordsConfig, RecordsRoute};
