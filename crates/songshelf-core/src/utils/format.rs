use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Placeholder for values that are missing or unparseable
const MISSING: &str = "-";

/// Output format for timestamps on playlist cards
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// First `chars` characters of `s`, with an ellipsis appended when cut.
pub fn preview_text(s: &str, chars: usize) -> String {
    if s.chars().count() <= chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(chars).collect();
        format!("{}...", head)
    }
}

/// Format a backend timestamp for display in local time.
///
/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS` (taken as local time) or
/// epoch milliseconds.
pub fn format_date(date: Option<&str>) -> String {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return MISSING.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.with_timezone(&Local).format(DATE_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DATE_FORMAT).to_string();
    }
    if let Ok(millis) = date.parse::<i64>() {
        if let Some(dt) = Local.timestamp_millis_opt(millis).single() {
            return dt.format(DATE_FORMAT).to_string();
        }
    }
    MISSING.to_string()
}

/// Format a length in seconds as `m:ss`.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            let total = secs.floor() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => MISSING.to_string(),
    }
}
