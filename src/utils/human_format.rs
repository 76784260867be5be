//! Human-readable formatting utilities for time values

use std::time::Duration;

/// Formats a time duration in milliseconds to a human-readable string
pub fn format_duration(millis: u64) -> String {
    if millis == 0 {
        return "0ms".to_string();
    }

    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        let seconds = millis as f64 / 1000.0;
        if seconds >= 10.0 {
            format!("{:.1}s", seconds)
        } else {
            format!("{:.2}s", seconds)
        }
    } else {
        let total_seconds = millis / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, seconds)
        }
    }
}

/// Formats a `Duration`, keeping sub-millisecond precision for fast stages
pub fn format_duration_precise(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else {
        format_duration(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.50s");
        assert_eq!(format_duration(12_300), "12.3s");
        assert_eq!(format_duration(120_000), "2m");
        assert_eq!(format_duration(125_000), "2m5s");
    }

    #[test]
    fn test_format_duration_precise() {
        assert_eq!(format_duration_precise(Duration::from_micros(420)), "420µs");
        assert_eq!(format_duration_precise(Duration::from_millis(42)), "42ms");
    }
}
