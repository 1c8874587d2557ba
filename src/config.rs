//! Application configuration

use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::SnowReportError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Connection settings for the external document store.
#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the document service. Empty means no store is
    /// configured; the dashboard then runs with default data only.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

/// Settings for the reconciliation pass itself.
#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Time zone all report timestamps are interpreted in.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default)]
    pub freshness: FreshnessPolicy,
    /// Display snow amount (inches) at or above which a resort counts as
    /// a powder day.
    #[serde(default = "default_powder_threshold")]
    pub powder_threshold: f64,
    /// Length of the trailing window for the daily snowfall series.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: Duration,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    #[serde(default = "default_emit_interval")]
    pub emit_interval: Duration,
}

/// When to stop trusting a resort's new-snow figures.
///
/// The two variants reflect the two policies seen in the field: a strict
/// calendar-day check, and a rolling tolerance measured from "now". Both
/// zero the same field set; base and summit depths are never touched here.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FreshnessPolicy {
    /// New snow counts only if the report was updated on today's calendar
    /// date in the report time zone.
    CalendarDay,
    /// New snow counts while the report is at most `tolerance_hours` old.
    /// A report aged exactly at the tolerance is still fresh.
    RollingWindow {
        #[serde(default = "default_tolerance_hours")]
        tolerance_hours: u32,
    },
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        FreshnessPolicy::CalendarDay
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            collection: default_collection(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            freshness: FreshnessPolicy::default(),
            powder_threshold: default_powder_threshold(),
            history_days: default_history_days(),
            cache_ttl: default_cache_ttl(),
            emit_interval: default_emit_interval(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("SNOWREPORT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), SnowReportError> {
        self.report.validate()
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), SnowReportError> {
        self.validate_history_days()?;
        self.validate_powder_threshold()?;
        self.validate_intervals()?;
        Ok(())
    }

    fn validate_history_days(&self) -> Result<(), SnowReportError> {
        if self.history_days == 0 {
            return Err(SnowReportError::ConfigurationError {
                message: "History window must cover at least one day".to_string(),
            });
        }
        Ok(())
    }

    fn validate_powder_threshold(&self) -> Result<(), SnowReportError> {
        if !self.powder_threshold.is_finite() || self.powder_threshold <= 0.0 {
            return Err(SnowReportError::ConfigurationError {
                message: "Powder threshold must be a positive number of inches".to_string(),
            });
        }
        Ok(())
    }

    fn validate_intervals(&self) -> Result<(), SnowReportError> {
        if self.cache_ttl.is_zero() {
            return Err(SnowReportError::ConfigurationError {
                message: "Cache TTL must be greater than zero".to_string(),
            });
        }
        if self.emit_interval.is_zero() {
            return Err(SnowReportError::ConfigurationError {
                message: "Emit interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_collection() -> String {
    "snow_reports".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_timezone() -> Tz {
    chrono_tz::America::Denver
}

fn default_powder_threshold() -> f64 {
    6.0
}

fn default_history_days() -> u32 {
    5
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(600)
}

fn default_emit_interval() -> Duration {
    Duration::from_secs(60)
}

fn default_tolerance_hours() -> u32 {
    18
}
