//! Data models.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use serde_helpers::*;

/// Sentinel for text fields a resort did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// One raw snow report document, one per resort per snapshot date.
///
/// Field shapes in the store are unreliable: numbers arrive as strings,
/// text fields come back null or blank, nested blocks go missing. All
/// coercion happens at deserialization so every downstream rule can assume
/// well-typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawReport {
    /// Compact machine identifier, e.g. `"BridgerBowl"`.
    pub resort: String,
    /// Snapshot query date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Self-reported update time. Free-form; may be absent or unparseable.
    #[serde(default = "not_available", deserialize_with = "deserialize_text")]
    pub last_updated: String,
    /// New snow at the summit over the last 24 hours, inches.
    #[serde(default, deserialize_with = "deserialize_number")]
    pub snow_24h_summit: f64,
    /// New snow at the base over the last 24 hours, inches.
    #[serde(default, deserialize_with = "deserialize_number")]
    pub snow_24h_base: f64,
    /// Standing snowpack at the base, inches.
    #[serde(default, deserialize_with = "deserialize_number")]
    pub base_depth: f64,
    /// Standing snowpack at the summit, inches.
    #[serde(default, deserialize_with = "deserialize_number")]
    pub summit_depth: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub snow_overnight: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub temp_base: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub temp_summit: f64,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub wind_speed: f64,
    #[serde(default = "not_available", deserialize_with = "deserialize_text")]
    pub lifts_open: String,
    #[serde(default = "not_available", deserialize_with = "deserialize_text")]
    pub runs_open: String,
    #[serde(default = "not_available", deserialize_with = "deserialize_text")]
    pub conditions_surface: String,
    #[serde(default = "not_available", deserialize_with = "deserialize_text")]
    pub comments: String,
    /// Scraped National Weather Service outlook, shape varies by resort.
    #[serde(default, deserialize_with = "deserialize_object")]
    pub nws_forecast: Map<String, Value>,
    /// Nearby SNOTEL station readings, shape varies by station.
    #[serde(default, deserialize_with = "deserialize_object")]
    pub snotel_data: Map<String, Value>,
}

impl RawReport {
    /// Parse `last_updated` into the report time zone.
    ///
    /// Naive timestamps are taken as wall-clock time in `tz`; timestamps
    /// carrying an offset are converted. Anything unparseable is `None`.
    pub fn last_updated_in(&self, tz: Tz) -> Option<DateTime<Tz>> {
        parse_local_timestamp(&self.last_updated, tz)
    }

    /// The snapshot date this document was recorded under.
    pub fn report_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Timestamp shapes observed in the store.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a report timestamp string as local time in `tz`.
pub fn parse_local_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NOT_AVAILABLE {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz));
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    // Date-only reports count as local midnight.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest();
    }
    None
}

/// Static resort reference data: display name and map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResortLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// One fully reconciled row of the current-conditions table.
///
/// Exactly one row exists per [`ResortLocation`] whether or not the store
/// had anything for it. Snowfall figures are post-staleness; `display_snow`
/// and `is_powder` are derived only after staleness zeroing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditionsRow {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub has_report: bool,
    pub report_date: Option<NaiveDate>,
    pub last_updated: String,
    pub last_updated_dt: Option<DateTime<Tz>>,
    pub snow_24h_summit: f64,
    pub snow_24h_base: f64,
    pub base_depth: f64,
    pub summit_depth: f64,
    pub snow_overnight: f64,
    pub temp_base: f64,
    pub temp_summit: f64,
    pub wind_speed: f64,
    pub lifts_open: String,
    pub runs_open: String,
    pub conditions_surface: String,
    pub comments: String,
    pub nws_forecast: Map<String, Value>,
    pub snotel_data: Map<String, Value>,
    /// `max(snow_24h_summit, snow_24h_base)` after staleness adjustment;
    /// drives sorting, the powder flag, and map labels.
    pub display_snow: f64,
    pub is_powder: bool,
}

/// One point of the trailing daily snowfall series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySnowPoint {
    pub display_name: String,
    pub date: NaiveDate,
    /// Snow attributed to this day, inches. Never negative.
    pub snow: f64,
    /// The resort's total across the whole window, repeated on every
    /// point for chart label convenience.
    pub total_snow: f64,
}

/// Custom deserializers
mod serde_helpers {
    use super::NOT_AVAILABLE;
    use serde::{self, Deserialize, Deserializer};
    use serde_json::{Map, Value};

    pub fn not_available() -> String {
        NOT_AVAILABLE.to_string()
    }

    /// Numbers may arrive as JSON numbers or numeric strings; anything
    /// else coerces to zero.
    pub fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        })
    }

    /// Text fields coerce to the `"N/A"` sentinel when null or blank;
    /// stray scalars are stringified.
    pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    NOT_AVAILABLE.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        })
    }

    /// Nested blocks default to an empty map unless they are objects.
    pub fn deserialize_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Object(map) => map,
            _ => Map::new(),
        })
    }
}
