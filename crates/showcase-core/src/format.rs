//! Display formatting shared by every front end.

use chrono::{Local, TimeZone};

/// Parse the leading integer of `s`, ignoring leading whitespace and any
/// trailing garbage (`"125abc"` → 125). `None` when no digits lead.
/// Values past `i64` saturate.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    // all digits, so the only parse failure is overflow
    let n = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}

/// `"125"` → `"2:05"`. Zero, negative, empty or non-numeric durations render as `"-"`.
pub fn format_duration(seconds: &str) -> String {
    match parse_leading_int(seconds) {
        Some(secs) if secs > 0 => format!("{}:{:02}", secs / 60, secs % 60),
        _ => "-".to_string(),
    }
}

/// Group digits in thousands: `"1234567"` → `"1,234,567"`.
/// Non-numeric input comes back unchanged.
pub fn format_count(count: &str) -> String {
    let Some(n) = parse_leading_int(count) else {
        return count.to_string();
    };
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Local calendar date of a millisecond timestamp, e.g. `"Jan 5, 2024"`.
pub fn format_added_at(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => "-".to_string(),
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
