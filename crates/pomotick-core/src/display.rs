//! Rendering helpers for the countdown: clock text and progress.

use crate::error::{Result, ValidationError};

/// First value that no longer fits on an `mm:ss` clock.
pub const CLOCK_LIMIT_SECS: u64 = 3600;

/// Zero-padded `mm:ss`. Values of an hour or more are rejected.
pub fn format_clock(remaining_secs: u64) -> Result<String> {
    if remaining_secs >= CLOCK_LIMIT_SECS {
        return Err(ValidationError::ClockOutOfRange(remaining_secs).into());
    }
    Ok(format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60))
}

/// Percentage of `total_secs` already elapsed, 0.0 when nothing was started.
///
/// Not clamped; renderers decide how to draw out-of-range values.
pub fn progress_percent(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs as f64 - remaining_secs as f64;
    elapsed / total_secs as f64 * 100.0
}

/// Fixed-width text bar for a percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width);
    bar.extend(std::iter::repeat('#').take(filled));
    bar.extend(std::iter::repeat('-').take(width - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0).unwrap(), "00:00");
        assert_eq!(format_clock(1).unwrap(), "00:01");
        assert_eq!(format_clock(25 * 60).unwrap(), "25:00");
        assert_eq!(format_clock(3599).unwrap(), "59:59");
    }

    #[test]
    fn clock_rejects_an_hour() {
        assert!(format_clock(3600).is_err());
    }

    #[test]
    fn quarter_of_a_pomodoro() {
        assert_eq!(progress_percent(1500, 1125), 25.0);
    }

    #[test]
    fn progress_edges() {
        assert_eq!(progress_percent(0, 0), 0.0);
        assert_eq!(progress_percent(300, 300), 0.0);
        assert_eq!(progress_percent(300, 0), 100.0);
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "----");
        assert_eq!(progress_bar(50.0, 4), "##--");
        assert_eq!(progress_bar(100.0, 4), "####");
        assert_eq!(progress_bar(250.0, 4), "####");
    }
}
