//! Sentiment markers
//!
//! Discrete visual indicator derived from a numeric change percentage.

/// Strong rally marker (> 15)
pub const TRIPLE_ROCKET: &str = "🚀🚀🚀";
/// Rally marker (> 5)
pub const ROCKET: &str = "🚀";
/// Mild gain marker (> 0)
pub const GREEN: &str = "🟢";
/// Loss marker (< 0)
pub const RED: &str = "🔴";
/// Flat / unresolved marker
pub const NEUTRAL: &str = "🎱";

/// Map a change percentage to its sentiment marker.
///
/// Thresholds are exact: `>15`, `(5, 15]`, `(0, 5]`, `<0`, and zero (or an
/// unresolved value coerced to zero) is neutral.
pub fn sentiment_emoji(value: f64) -> &'static str {
    if value > 15.0 {
        TRIPLE_ROCKET
    } else if value > 5.0 {
        ROCKET
    } else if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(sentiment_emoji(20.0), TRIPLE_ROCKET);
        assert_eq!(sentiment_emoji(10.0), ROCKET);
        assert_eq!(sentiment_emoji(3.0), GREEN);
        assert_eq!(sentiment_emoji(-1.0), RED);
        assert_eq!(sentiment_emoji(0.0), NEUTRAL);
    }

    #[test]
    fn test_boundary_values() {
        assert_eq!(sentiment_emoji(15.0), ROCKET);
        assert_eq!(sentiment_emoji(15.000001), TRIPLE_ROCKET);
        assert_eq!(sentiment_emoji(5.0), GREEN);
        assert_eq!(sentiment_emoji(0.0001), GREEN);
        assert_eq!(sentiment_emoji(-0.0001), RED);
    }

    #[test]
    fn test_nan_is_neutral() {
        // NaN fails every comparison, falling through to neutral
        assert_eq!(sentiment_emoji(f64::NAN), NEUTRAL);
    }
}
