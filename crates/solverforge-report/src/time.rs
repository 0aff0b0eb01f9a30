//! Time formatting for report tables, chart axes and console output.

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Formats a duration compactly, switching unit as it grows.
///
/// # Example
///
/// ```
/// use solverforge_report::time::format_duration_ms;
///
/// assert_eq!(format_duration_ms(999), "999ms");
/// assert_eq!(format_duration_ms(1_500), "1.50s");
/// assert_eq!(format_duration_ms(125_000), "2m 5s");
/// ```
pub fn format_duration_ms(ms: u64) -> String {
    if ms < MILLIS_PER_SECOND {
        format!("{}ms", ms)
    } else if ms < MILLIS_PER_MINUTE {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / MILLIS_PER_MINUTE;
        let secs = (ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;
        format!("{}m {}s", mins, secs)
    }
}

/// Formats milliseconds as the non-zero units from days down to milliseconds.
///
/// Labels the tick spacing of time axes in chart JSON, where `0` must still
/// render.
///
/// # Example
///
/// ```
/// use solverforge_report::time::humanize_millis;
///
/// assert_eq!(humanize_millis(0), "0ms");
/// assert_eq!(humanize_millis(3_723_004), "1h 2m 3s 4ms");
/// assert_eq!(humanize_millis(60_000), "1m");
/// ```
pub fn humanize_millis(ms: u64) -> String {
    if ms == 0 {
        return "0ms".to_string();
    }
    let units = [
        (ms / MILLIS_PER_DAY, "d"),
        ((ms % MILLIS_PER_DAY) / MILLIS_PER_HOUR, "h"),
        ((ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE, "m"),
        ((ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND, "s"),
        (ms % MILLIS_PER_SECOND, "ms"),
    ];
    units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats milliseconds as `HH:MM:SS.mmm`. Hours do not wrap at 24.
///
/// Labels the bounds of time axes in chart JSON.
///
/// # Example
///
/// ```
/// use solverforge_report::time::format_clock;
///
/// assert_eq!(format_clock(3_723_004), "01:02:03.004");
/// ```
pub fn format_clock(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        ms / MILLIS_PER_HOUR,
        (ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
        (ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
        ms % MILLIS_PER_SECOND
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_boundaries() {
        assert_eq!(format_duration_ms(0), "0ms");
        assert_eq!(format_duration_ms(1_000), "1.00s");
        assert_eq!(format_duration_ms(59_999), "60.00s");
        assert_eq!(format_duration_ms(60_000), "1m 0s");
        assert_eq!(format_duration_ms(3_600_000), "60m 0s");
    }

    #[test]
    fn test_humanize_skips_zero_units() {
        assert_eq!(humanize_millis(1), "1ms");
        assert_eq!(humanize_millis(1_001), "1s 1ms");
        assert_eq!(humanize_millis(86_400_000), "1d");
        assert_eq!(humanize_millis(90_061_001), "1d 1h 1m 1s 1ms");
    }

    #[test]
    fn test_clock_past_a_day() {
        assert_eq!(format_clock(0), "00:00:00.000");
        assert_eq!(format_clock(90_000_000), "25:00:00.000");
    }
}
