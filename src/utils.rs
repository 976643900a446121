//! Common utility functions used across modules.
//!
//! - [`format_count`] - Format counts with K/M suffix (1.5K, 2.3M)
//! - [`truncate`] - Truncate strings with ellipsis

/// Format a count with K/M suffix for compact display.
///
/// # Examples
/// ```
/// use rulecast::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(1500), "1.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Truncate a string to at most `max_len` characters, adding "..." if truncated.
///
/// # Examples
/// ```
/// use rulecast::utils::truncate;
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("tracker_domain_long", 10), "tracker...");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
