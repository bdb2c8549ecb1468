//! The frozen episode clock
//!
//! Every mutation in an episode is stamped with the same constant so that
//! fixture comparisons are byte-exact. The constants live here and nowhere
//! else.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::ToolError;

/// Timestamp written into `created_at` / `updated_at` on every mutation
pub const FROZEN_TIMESTAMP: &str = "2025-10-15T09:00:00Z";

/// The "current date" used for date-ordering checks (the date part of
/// [`FROZEN_TIMESTAMP`])
pub const FROZEN_DATE: &str = "2025-10-15";

/// The current date as a typed value
pub fn today() -> NaiveDate {
    // FROZEN_DATE is a compile-time constant in ISO format
    #[allow(clippy::unwrap_used)]
    NaiveDate::parse_from_str(FROZEN_DATE, "%Y-%m-%d").unwrap()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ToolError::InvalidDate(value.to_string()))
}

/// Parse an ISO 8601 datetime argument (fixture timestamps carry `Z`)
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ToolError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ToolError::InvalidDate(value.to_string()))
}

/// Stamp a freshly created record: `created_at = updated_at = frozen`
pub fn stamp_new(record: &mut Map<String, Value>) {
    record.insert(
        "created_at".to_string(),
        Value::String(FROZEN_TIMESTAMP.to_string()),
    );
    record.insert(
        "updated_at".to_string(),
        Value::String(FROZEN_TIMESTAMP.to_string()),
    );
}

/// Stamp a successful mutation: `updated_at = frozen`, `created_at` untouched
pub fn stamp_updated(record: &mut Map<String, Value>) {
    record.insert(
        "updated_at".to_string(),
        Value::String(FROZEN_TIMESTAMP.to_string()),
    );
}
