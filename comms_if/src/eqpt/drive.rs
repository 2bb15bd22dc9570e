//! # Drive Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A field-relative chassis velocity demand for the swerve drive.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct DriveDem {
    /// Velocity along the field X axis in meters/second.
    pub vx_ms: f64,

    /// Velocity along the field Y axis in meters/second.
    pub vy_ms: f64,

    /// Rotation rate in radians/second, positive counter-clockwise.
    pub rate_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveDem {
    /// A demand which holds the chassis still.
    pub fn stop() -> Self {
        Self::default()
    }

    /// True if every component of the demand is zero.
    pub fn is_stop(&self) -> bool {
        self.vx_ms == 0.0 && self.vy_ms == 0.0 && self.rate_rads == 0.0
    }
}
