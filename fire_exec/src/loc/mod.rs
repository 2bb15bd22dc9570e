//! # Localisation types
//!
//! Field-frame geometry shared by the control modules. The pose and chassis
//! velocity are supplied once per cycle by the drive and odometry drivers and
//! are read-only to the fire control core.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};
use util::maths::wrap_to_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose of the robot in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    /// Position of the robot centre in the field frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading of the robot, the angle from the field +X axis, wrapped to
    /// `[-pi, pi)`.
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// The velocity of the chassis.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChassisVel {
    /// Translational velocity, expressed in `frame`.
    ///
    /// Units: meters/second
    pub vel_ms: Vector2<f64>,

    /// Rotation rate, positive counter-clockwise.
    ///
    /// Units: radians/second
    pub rate_rads: f64,

    /// The frame `vel_ms` is expressed in.
    pub frame: VelFrame,
}

/// The static field position of the scoring target.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,
}

/// Range and bearing from the robot to the target, derived each cycle.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct TargetGeom {
    /// Straight line distance from the robot centre to the target.
    ///
    /// Units: meters
    pub range_m: f64,

    /// Field-frame angle of the line from the robot to the target.
    ///
    /// Units: radians
    pub bearing_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reference frame of a chassis velocity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelFrame {
    /// +X forwards out of the robot, +Y to the robot's left.
    Robot,
    /// Field-fixed axes.
    Field,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for VelFrame {
    fn default() -> Self {
        VelFrame::Field
    }
}

impl Pose {
    /// Create a new pose, wrapping the heading.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad: wrap_to_pi(heading_rad),
        }
    }

    pub fn x(&self) -> f64 {
        self.position_m[0]
    }

    pub fn y(&self) -> f64 {
        self.position_m[1]
    }

    /// True if every component of the pose is a finite number.
    pub fn is_finite(&self) -> bool {
        self.position_m.iter().all(|v| v.is_finite()) && self.heading_rad.is_finite()
    }
}

impl ChassisVel {
    /// A field-relative velocity.
    pub fn field(vx_ms: f64, vy_ms: f64, rate_rads: f64) -> Self {
        Self {
            vel_ms: Vector2::new(vx_ms, vy_ms),
            rate_rads,
            frame: VelFrame::Field,
        }
    }

    /// A robot-relative velocity.
    pub fn robot(vx_ms: f64, vy_ms: f64, rate_rads: f64) -> Self {
        Self {
            vel_ms: Vector2::new(vx_ms, vy_ms),
            rate_rads,
            frame: VelFrame::Robot,
        }
    }

    /// Get the translational velocity in the field frame.
    ///
    /// Robot-relative velocities are rotated by the robot's heading. A
    /// velocity with non-finite components is treated as stationary.
    pub fn field_relative(&self, heading_rad: f64) -> Vector2<f64> {
        if !self.vel_ms.iter().all(|v| v.is_finite()) {
            return Vector2::zeros();
        }

        match self.frame {
            VelFrame::Field => self.vel_ms,
            VelFrame::Robot => Rotation2::new(heading_rad) * self.vel_ms,
        }
    }
}

impl TargetSpec {
    /// Position of the target as a vector.
    pub fn position_m(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }

    /// Compute the range and bearing to the target from the given pose.
    pub fn geom_from(&self, pose: &Pose) -> TargetGeom {
        let delta = self.position_m() - pose.position_m;

        TargetGeom {
            range_m: delta.norm(),
            bearing_rad: delta[1].atan2(delta[0]),
        }
    }
}
