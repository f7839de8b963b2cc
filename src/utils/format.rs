//! Human-readable formatting helpers for sizes, durations and view counts

/// Format a byte count as a megabyte string with one decimal place.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1_048_576.0)
}

/// Format a duration in seconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format a view count with a K/M suffix past the respective thresholds.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K views", views as f64 / 1_000.0)
    } else {
        format!("{} views", views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size_mb(47_185_920), "45.0 MB");
        assert_eq!(format_size_mb(1_048_576), "1.0 MB");
        assert_eq!(format_size_mb(0), "0.0 MB");
        assert_eq!(format_size_mb(8_912_896), "8.5 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(630), "10:30");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(3723), "1:02:03");
        assert_eq!(format_duration(0), "0:00");
    }

    #[test]
    fn test_format_views() {
        assert_eq!(format_views(1_500_000), "1.5M views");
        assert_eq!(format_views(12_300), "12.3K views");
        assert_eq!(format_views(999), "999 views");
        assert_eq!(format_views(0), "0 views");
    }
}
