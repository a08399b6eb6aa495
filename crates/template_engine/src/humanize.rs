//! Compact currency formatting
//!
//! Magnitude-appropriate unit suffixes, with extra precision for sub-dollar
//! values where the interesting digits live far behind the decimal point.

/// Format a USD amount as a compact human-readable string.
///
/// Buckets:
/// - `v < 1000` → `$X.XX`
/// - `1000 <= v < 1e6` → `$X.XXK`
/// - `1e6 <= v < 1e9` → `$X.XXM`
/// - `v >= 1e9` → `$X.XXB`
///
/// Sub-dollar precision grows as magnitude shrinks: 3 decimals down to 0.01,
/// 4 down to 0.001, 5 down to 0.0001, else back to 2.
pub fn humanize_usd(value: f64) -> String {
    if value < 1.0 && value > 0.01 {
        return format!("${value:.3}");
    }
    if value < 1.0 && value > 0.001 {
        return format!("${value:.4}");
    }
    if value < 1.0 && value > 0.0001 {
        return format!("${value:.5}");
    }

    if value < 1_000.0 {
        return format!("${value:.2}");
    }
    if value < 1_000_000.0 {
        return format!("${:.2}K", value / 1_000.0);
    }
    if value < 1_000_000_000.0 {
        return format!("${:.2}M", value / 1_000_000.0);
    }

    format!("${:.2}B", value / 1_000_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_bucket() {
        assert_eq!(humanize_usd(0.0), "$0.00");
        assert_eq!(humanize_usd(1.0), "$1.00");
        assert_eq!(humanize_usd(999.0), "$999.00");
        assert_eq!(humanize_usd(999.999), "$1000.00");
    }

    #[test]
    fn test_thousands_bucket() {
        assert_eq!(humanize_usd(1_000.0), "$1.00K");
        assert_eq!(humanize_usd(1_234.5), "$1.23K");
        assert_eq!(humanize_usd(999_999.0), "$1000.00K");
    }

    #[test]
    fn test_millions_and_billions() {
        assert_eq!(humanize_usd(1_000_000.0), "$1.00M");
        assert_eq!(humanize_usd(1_500_000.0), "$1.50M");
        assert_eq!(humanize_usd(2_000_000_000.0), "$2.00B");
        assert_eq!(humanize_usd(12_340_000_000.0), "$12.34B");
    }

    #[test]
    fn test_sub_dollar_precision() {
        assert_eq!(humanize_usd(0.5), "$0.500");
        assert_eq!(humanize_usd(0.0123), "$0.012");
        assert_eq!(humanize_usd(0.005), "$0.0050");
        assert_eq!(humanize_usd(0.00032), "$0.00032");
        // Below the finest bucket, back to two decimals
        assert_eq!(humanize_usd(0.00001), "$0.00");
    }
}
