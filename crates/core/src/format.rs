use chrono::NaiveDate;

use crate::types::TranscriptEntry;

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Compact view/like/subscriber count. Zero means the provider had nothing.
pub fn format_count(count: u64) -> String {
    if count == 0 {
        return "unknown".to_string();
    }
    if count >= 1_000_000 {
        let millions = format!("{:.1}", count as f64 / 1_000_000.0);
        let millions = millions.strip_suffix(".0").unwrap_or(&millions);
        return format!("{}M", millions);
    }
    if count >= 1_000 {
        return format!("{}K", (count as f64 / 1_000.0).round() as u64);
    }
    count.to_string()
}

/// `YYYYMMDD` becomes `YYYY-MM-DD`; anything else is passed through.
pub fn format_upload_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// Format transcript entries with timestamps, one per line
pub fn format_transcript_with_timestamps(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("[{}] {}", entry.timestamp(), entry.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry texts joined by single spaces, timing dropped
pub fn format_transcript_plain(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `h:mm:ss`, `m:ss` or plain seconds.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if !raw.contains(':') {
        return raw.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0);
    }

    let mut total = 0.0;
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() > 3 {
        return None;
    }
    for part in parts {
        let value = part.parse::<u32>().ok()?;
        total = total * 60.0 + f64::from(value);
    }
    Some(total)
}
