//! # Reference Calendar
//!
//! Reads order timestamps as civil time in the restaurant's timezone.
//!
//! The weekend and early diner rules ask "what day is it in Rome?" and "what
//! hour is it in Rome?". The answer depends only on the instant, never on the
//! offset the timestamp was written in, and never on the machine's local zone.
//!
//! ```text
//! 2024-01-12T23:30:00Z          (Friday in UTC)
//!        │ with_timezone(Europe/Rome)
//!        ▼
//! 2024-01-13T00:30:00+01:00     (Saturday in Rome) → weekend
//! ```

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

/// Timezone the calendar rules are evaluated in.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Europe::Rome;

/// First hour (local, 24h clock) that no longer counts as early dining.
pub const EARLY_DINER_CUTOFF_HOUR: u32 = 20;

/// Naive formats accepted from `datetime-local` form fields.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Converts an instant to civil time in the reference timezone.
pub fn reference_time(at: &DateTime<FixedOffset>) -> DateTime<Tz> {
    at.with_timezone(&REFERENCE_TIMEZONE)
}

/// True when the instant falls on a Saturday or Sunday in the reference zone.
pub fn is_weekend(at: &DateTime<FixedOffset>) -> bool {
    matches!(reference_time(at).weekday(), Weekday::Sat | Weekday::Sun)
}

/// True when the local hour in the reference zone is before the cutoff.
///
/// This says nothing about the day of week; the early diner rule combines it
/// with [`is_weekend`].
pub fn is_early_diner_hour(at: &DateTime<FixedOffset>) -> bool {
    reference_time(at).hour() < EARLY_DINER_CUTOFF_HOUR
}

/// Parses an order timestamp.
///
/// ## Accepted Forms
/// - RFC 3339 with an offset: `2024-01-15T15:00:00Z`, `2024-01-15T16:00:00+01:00`
/// - Naive form values: `2024-01-15T19:30`, `2024-01-15T19:30:00`, read as
///   civil time in the reference zone
///
/// A naive time skipped by a DST change returns `None`; a repeated one
/// resolves to the earlier instant.
pub fn parse_order_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())?;

    REFERENCE_TIMEZONE
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
}

/// Serde adapter for fields filled from the order form's date-time input.
pub fn deserialize_order_time<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_order_time(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid order time: '{}'", text)))
}

// =============================================================================
// Unit Tests
// =============================================================================
