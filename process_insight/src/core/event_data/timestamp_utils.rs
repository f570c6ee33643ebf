//! Timestamp parsing shared by the event table importers

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse a timestamp string to `DateTime<FixedOffset>`, trying multiple formats.
///
/// Timestamps without timezone information are interpreted as UTC.
///
/// # Supported Formats (in order of precedence)
/// 1. Custom format (if provided), both timezone-aware and naive
/// 2. RFC3339: `2023-10-06T09:30:21+00:00`
/// 3. ISO 8601 with offset (no colon): `2023-10-06T09:30:21+0000`
/// 4. RFC2822: `Fri, 06 Oct 2023 09:30:21 +0000`
/// 5. Naive datetime with optional fractional seconds: `2022-01-01 08:00:00`, `2023-10-06 09:30:21.890421`
/// 6. Naive ISO 8601 with optional fractional seconds: `2023-10-06T09:30:21.348555`
/// 7. Naive datetime without seconds: `2022-01-01 08:00`
/// 8. Naive with UTC suffix: `2023-10-06 09:30:21 UTC`
/// 9. Date only: `2022-01-01` (midnight)
pub fn parse_timestamp<'a>(
    time: &'a str,
    custom_format: Option<&str>,
) -> Result<DateTime<FixedOffset>, &'a str> {
    let time = time.trim();
    if let Some(date_format) = custom_format {
        if let Ok(dt) = DateTime::parse_from_str(time, date_format) {
            return Ok(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, date_format) {
            return Ok(dt.and_utc().into());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(time) {
        return Ok(dt);
    }

    // `%.f` also accepts a missing fractional part
    for naive_format in ["%F %T%.f", "%FT%T%.f", "%F %H:%M", "%F %T UTC"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, naive_format) {
            return Ok(dt.and_utc().into());
        }
    }

    if let Some(dt) = NaiveDate::parse_from_str(time, "%F")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc().into());
    }

    tracing::trace!(value = time, "failed to parse timestamp");
    Err(time)
}
