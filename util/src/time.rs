//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}

/// Convert a number of milliseconds into a `std::time::Duration`.
///
/// Non-positive values give a zero duration.
pub fn millis(ms: i64) -> std::time::Duration {
    if ms <= 0 {
        std::time::Duration::from_millis(0)
    }
    else {
        std::time::Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(duration_to_seconds(chrono::Duration::milliseconds(1500)), Some(1.5));
        assert_eq!(duration_to_seconds(chrono::Duration::zero()), Some(0.0));
    }

    #[test]
    fn test_millis() {
        assert_eq!(millis(-4), std::time::Duration::from_millis(0));
        assert_eq!(millis(250), std::time::Duration::from_millis(250));
    }
}
