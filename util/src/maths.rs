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

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap a value into the half-open interval `[min, max)`.
///
/// Used for continuous inputs such as headings, where `min` and `max` are the
/// same physical point.
pub fn input_modulus<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let span = max - min;
    let wrapped = min + rem_euclid(value - min, span);

    // Round-off in rem_euclid can land exactly on the upper bound
    if wrapped >= max { min } else { wrapped }
}

/// Wrap an angle in radians into `[-pi, pi)`.
pub fn wrap_to_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    input_modulus(angle, -pi_t, pi_t)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 10.0), (0.0, 100.0), 2.5), 25.0);
        assert_eq!(lin_map((1.0, 2.0), (4.0, 2.0), 1.5), 3.0);
    }

    #[test]
    fn test_input_modulus() {
        assert_abs_diff_eq!(input_modulus(190.0, -180.0, 180.0), -170.0);
        assert_abs_diff_eq!(input_modulus(-190.0, -180.0, 180.0), 170.0);
        assert_abs_diff_eq!(input_modulus(180.0, -180.0, 180.0), -180.0);
        assert_abs_diff_eq!(input_modulus(45.0, -180.0, 180.0), 45.0);
        assert_abs_diff_eq!(input_modulus(725.0, 0.0, 360.0), 5.0);
    }

    #[test]
    fn test_wrap_to_pi() {
        assert_abs_diff_eq!(wrap_to_pi(PI + 0.5), -PI + 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_to_pi(-PI / 2.0), -PI / 2.0);
        assert_abs_diff_eq!(wrap_to_pi(2.0 * PI + 0.1), 0.1, epsilon = 1e-12);
    }
}
