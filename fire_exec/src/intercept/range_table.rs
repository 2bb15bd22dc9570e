//! Range to launch speed table

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Piecewise linear map from target range to stationary launch speed.
///
/// Ranges outside the calibrated span are clamped to the nearest end point,
/// the table never extrapolates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeSpeedTable {
    points: Vec<[f64; 2]>,
}

/// Reasons a table is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("The range to speed table is empty")]
    Empty,

    #[error("Entry {0} of the range to speed table is not finite")]
    NotFinite(usize),

    #[error("Range at entry {0} is not greater than the previous range")]
    RangeNotIncreasing(usize),

    #[error("Speed at entry {0} is less than the previous speed")]
    SpeedDecreasing(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RangeSpeedTable {
    /// Build a table from `[range_m, speed_ms]` pairs.
    ///
    /// The points are not checked here, [`RangeSpeedTable::validate`] is
    /// used by the parameter loader for that.
    pub fn new(points: &[[f64; 2]]) -> Self {
        Self { points: points.to_vec() }
    }

    /// Check the table is non-empty, finite and monotonic.
    pub fn validate(points: &[[f64; 2]]) -> Result<(), TableError> {
        if points.is_empty() {
            return Err(TableError::Empty);
        }

        for (i, p) in points.iter().enumerate() {
            if !p[0].is_finite() || !p[1].is_finite() {
                return Err(TableError::NotFinite(i));
            }

            if i > 0 {
                if p[0] <= points[i - 1][0] {
                    return Err(TableError::RangeNotIncreasing(i));
                }
                if p[1] < points[i - 1][1] {
                    return Err(TableError::SpeedDecreasing(i));
                }
            }
        }

        Ok(())
    }

    /// Get the stationary launch speed for a shot from `range_m`.
    ///
    /// An empty table or a non-finite range gives zero.
    pub fn speed_for_range(&self, range_m: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0
        };

        if !range_m.is_finite() {
            return 0.0;
        }

        if range_m <= first[0] {
            return first[1];
        }
        if range_m >= last[0] {
            return last[1];
        }

        // Find the segment containing the range
        for seg in self.points.windows(2) {
            let (lo, hi) = (seg[0], seg[1]);
            if range_m <= hi[0] {
                return lin_map((lo[0], hi[0]), (lo[1], hi[1]), range_m);
            }
        }

        last[1]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table() -> RangeSpeedTable {
        RangeSpeedTable::new(&[[1.0, 6.0], [2.0, 8.0], [4.0, 9.0]])
    }

    #[test]
    fn test_interpolation() {
        let t = table();
        assert_abs_diff_eq!(t.speed_for_range(1.5), 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t.speed_for_range(2.0), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t.speed_for_range(3.0), 8.5, epsilon = 1e-12);
    }

    #[test]
    fn test_clamped_at_ends() {
        let t = table();
        assert_eq!(t.speed_for_range(0.2), 6.0);
        assert_eq!(t.speed_for_range(-3.0), 6.0);
        assert_eq!(t.speed_for_range(4.0001), 9.0);
        assert_eq!(t.speed_for_range(100.0), 9.0);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(RangeSpeedTable::default().speed_for_range(2.0), 0.0);
        assert_eq!(table().speed_for_range(std::f64::NAN), 0.0);

        let single = RangeSpeedTable::new(&[[3.0, 7.5]]);
        assert_eq!(single.speed_for_range(1.0), 7.5);
        assert_eq!(single.speed_for_range(5.0), 7.5);
    }

    #[test]
    fn test_validate() {
        assert!(RangeSpeedTable::validate(&[[1.0, 6.0], [2.0, 6.0]]).is_ok());
        assert_eq!(RangeSpeedTable::validate(&[]), Err(TableError::Empty));
        assert_eq!(
            RangeSpeedTable::validate(&[[1.0, 6.0], [1.0, 7.0]]),
            Err(TableError::RangeNotIncreasing(1))
        );
        assert_eq!(
            RangeSpeedTable::validate(&[[1.0, 6.0], [2.0, 5.0]]),
            Err(TableError::SpeedDecreasing(1))
        );
        assert_eq!(
            RangeSpeedTable::validate(&[[1.0, std::f64::INFINITY]]),
            Err(TableError::NotFinite(0))
        );
    }
}
