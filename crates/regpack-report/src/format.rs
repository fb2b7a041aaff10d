//! Shared formatting helpers for reports.

/// Render an ASCII bar chart.
///
/// Example output: `[████████░░░░░░░░░░░░]  42.0%`
pub fn bar_chart(used: u64, available: u64, bar_width: usize) -> String {
    if available == 0 {
        let empty = "░".repeat(bar_width);
        return format!("[{empty}]   0.0%");
    }

    let percent = (used as f64 / available as f64) * 100.0;
    let filled = ((percent / 100.0) * bar_width as f64).round() as usize;
    let filled = filled.min(bar_width);

    format!(
        "[{}{}] {percent:5.1}%",
        "█".repeat(filled),
        "░".repeat(bar_width - filled)
    )
}

/// Format a nanosecond duration into a human-readable string.
pub fn format_time_ns(ns: u128) -> String {
    if ns < 1_000 {
        format!("{ns}ns")
    } else if ns < 1_000_000 {
        format!("{:.1}us", ns as f64 / 1_000.0)
    } else if ns < 1_000_000_000 {
        format!("{:.1}ms", ns as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", ns as f64 / 1_000_000_000.0)
    }
}

/// Bit slice as `[msb:lsb]`.
pub fn bit_slice(msb: u8, lsb: u8) -> String {
    format!("[{msb}:{lsb}]")
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_chart_half() {
        assert_eq!(bar_chart(16, 32, 8), "[████░░░░]  50.0%");
    }

    #[test]
    fn bar_chart_empty_denominator() {
        assert_eq!(bar_chart(0, 0, 4), "[░░░░]   0.0%");
    }

    #[test]
    fn time_scales() {
        assert_eq!(format_time_ns(255), "255ns");
        assert_eq!(format_time_ns(40_000), "40.0us");
        assert_eq!(format_time_ns(65_535_000_000), "65.54s");
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(17.0 / 384.0 * 100.0), 4.43);
        assert_eq!(bit_slice(15, 15), "[15:15]");
    }
}
