//! Date helper functions

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Convert Moment.js format to chrono format
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Parse an ISO 8601 timestamp as returned by the Notion API
pub fn parse_timestamp(ts: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(ts.trim()).ok()
}

/// Format an API timestamp for display in `tz` (UTC when `None`).
///
/// Missing timestamps give `None`; unparseable ones are returned verbatim.
pub fn format_timestamp(
    ts: Option<&str>,
    format: &str,
    tz: Option<chrono_tz::Tz>,
) -> Option<String> {
    let ts = ts?;
    let Some(parsed) = parse_timestamp(ts) else {
        tracing::debug!("Unparseable timestamp {:?}", ts);
        return Some(ts.to_string());
    };

    Some(match tz {
        Some(tz) => format_date(&parsed.with_timezone(&tz), format),
        None => format_date(&parsed.with_timezone(&Utc), format),
    })
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longer tokens first within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month (uppercase M)
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour 24h
        ("HH", "%H"),
        // Hour 12h
        ("hh", "%I"),
        // Minute, after MM is gone
        ("mm", "%M"),
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
