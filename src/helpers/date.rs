//! Date helper functions

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format a timestamp the way the post byline shows it (`3/1/2022, 10:00:00 AM`)
///
/// `timezone` is an IANA name; empty or unknown names fall back to UTC.
pub fn published_at(date: &DateTime<Utc>, timezone: &str) -> String {
    const FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

    match parse_timezone(timezone) {
        Some(tz) => date.with_timezone(&tz).format(FORMAT).to_string(),
        None => date.format(FORMAT).to_string(),
    }
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

fn parse_timezone(name: &str) -> Option<Tz> {
    if name.is_empty() {
        return None;
    }
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::warn!("Unknown timezone {:?}, using UTC", name);
            None
        }
    }
}
