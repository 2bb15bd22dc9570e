//! Pose lock parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains and tolerance for a single axis controller.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct AxisGains {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    #[serde(default)]
    pub k_i: f64,

    /// Derivative gain
    #[serde(default)]
    pub k_d: f64,

    /// The axis is at its setpoint when the absolute error is at or below
    /// this value. Same units as the axis.
    pub tolerance: f64,
}

/// Parameters for pose lock
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Field X position controller.
    ///
    /// Units: meters (tolerance), 1/s (k_p)
    pub x: AxisGains,

    /// Field Y position controller.
    ///
    /// Units: meters (tolerance), 1/s (k_p)
    pub y: AxisGains,

    /// Heading controller used when locking to a pose.
    ///
    /// Units: radians (tolerance), 1/s (k_p)
    pub heading: AxisGains,

    /// Heading controller used when aiming at a firing heading. Its tolerance
    /// decides when the chassis counts as aligned to the target.
    ///
    /// Units: radians (tolerance), 1/s (k_p)
    pub aim: AxisGains,

    /// Maximum translational demand on each field axis.
    ///
    /// Units: meters/second
    pub max_trans_ms: f64,

    /// Maximum rotational demand.
    ///
    /// Units: radians/second
    pub max_rot_rads: f64,
}

impl AxisGains {
    /// True if every gain and the tolerance are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.k_p, self.k_i, self.k_d, self.tolerance]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            x: AxisGains { k_p: 1.0, k_i: 0.0, k_d: 0.0, tolerance: 0.05 },
            y: AxisGains { k_p: 1.0, k_i: 0.0, k_d: 0.0, tolerance: 0.05 },
            heading: AxisGains { k_p: 1.15, k_i: 0.0, k_d: 0.0, tolerance: 0.035 },
            aim: AxisGains { k_p: 1.0, k_i: 0.0, k_d: 0.0, tolerance: 0.05 },
            max_trans_ms: 1.2,
            max_rot_rads: 2.0,
        }
    }
}
