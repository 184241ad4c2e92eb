//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where 
    T: Float 
{
    target_range.0 
        + ((value - source_range.0) 
        * (target_range.1 - target_range.0) 
        / (source_range.1 - source_range.0))
}

/// Limit a value to the inclusive range `[min, max]`.
///
/// Works for integer and floating point values alike. If `min > max` the
/// result is `min`.
pub fn clamp<T>(value: T, min: T, max: T) -> T 
where
    T: PartialOrd
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Return `true` if the value lies within the inclusive range `[min, max]`.
pub fn in_range<T>(value: T, min: T, max: T) -> bool
where
    T: PartialOrd
{
    value >= min && value <= max
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 180f64), (500f64, 2500f64), 0f64), 500f64);
        assert_eq!(lin_map((0f64, 180f64), (500f64, 2500f64), 90f64), 1500f64);
        assert_eq!(lin_map((0f64, 180f64), (500f64, 2500f64), 180f64), 2500f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-20, 0, 180), 0);
        assert_eq!(clamp(200, 0, 180), 180);
        assert_eq!(clamp(42, 0, 180), 42);
        assert_eq!(clamp(i32::MIN, 0, 180), 0);
        assert_eq!(clamp(1.5f64, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_in_range() {
        assert!(in_range(0, 0, 180));
        assert!(in_range(180, 0, 180));
        assert!(!in_range(181, 0, 180));
        assert!(!in_range(-1, 0, 180));
    }
}
