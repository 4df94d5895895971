//! Text formatting helpers for the dashboard views.

use agentdeck_core::TaskStatus;
use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Truncate a string to fit within a given width, adding ellipsis if needed.
pub fn truncate(text: &str, max_width: usize) -> String {
    if max_width < 3 {
        return text.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();

    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width - 3 {
            result.push_str("...");
            return result;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

/// Short clock-time rendering for list rows; "-" when absent.
pub fn short_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Stable lowercase label for a task status.
pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Processing => "processing",
        TaskStatus::Completed => "completed",
        TaskStatus::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello world", 8), "Hello...");
        assert_eq!(truncate("Hi", 10), "Hi");
    }

    #[test]
    fn test_short_time() {
        let at = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 9, 30, 5).unwrap();
        assert_eq!(short_time(Some(at)), "09:30:05");
        assert_eq!(short_time(None), "-");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(TaskStatus::Processing), "processing");
    }
}
