use crate::models::EMAIL_NOT_FOUND;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();
}

/// First email address found in `text`, scanning left to right, or the
/// `"Not found"` sentinel.
pub fn extract_email(text: &str) -> String {
    EMAIL_REGEX
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| EMAIL_NOT_FOUND.to_string())
}

/// Compact display form of a count, e.g. `1.2M`.
pub fn format_number(num: u64) -> String {
    match num {
        _ if num >= 1_000_000_000 => format!("{:.1}B", num as f64 / 1_000_000_000.0),
        _ if num >= 1_000_000 => format!("{:.1}M", num as f64 / 1_000_000.0),
        _ if num >= 1_000 => format!("{:.1}K", num as f64 / 1_000.0),
        _ => num.to_string(),
    }
}

pub fn channel_link(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{channel_id}")
}
