//! Intercept solver

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Rotation2, Vector2};
use serde::Serialize;

// Internal
use super::{Params, RangeSpeedTable};
use crate::loc::TargetGeom;
use util::maths::wrap_to_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct InterceptSolver {
    params: Params,
    table: RangeSpeedTable,
}

/// A compensated firing solution.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct FiringSolution {
    /// Launch speed for the same shot from a stationary robot.
    ///
    /// Units: meters/second
    pub stationary_speed_ms: f64,

    /// Launch speed the shooter must provide relative to the moving robot.
    ///
    /// Units: meters/second
    pub launch_speed_ms: f64,

    /// Signed angle from the bearing to the target to the compensated
    /// launch direction, positive counter-clockwise.
    ///
    /// Units: radians
    pub heading_offset_rad: f64,

    /// Field heading the chassis must hold to take the shot.
    ///
    /// Units: radians
    pub heading_cmd_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InterceptSolver {
    pub fn new(params: Params) -> Self {
        let table = RangeSpeedTable::new(&params.range_speed_table);
        Self { params, table }
    }

    /// Replace the parameters, rebuilding the range table.
    pub fn set_params(&mut self, params: Params) {
        self.table = RangeSpeedTable::new(&params.range_speed_table);
        self.params = params;
    }

    /// Solve for a shot at the target, taking the stationary speed from the
    /// range table at `range_m`.
    ///
    /// `range_m` is usually `geom.range_m`, but may come from a fixed range
    /// command or a direct range measurement.
    pub fn solve_for_range(
        &self,
        range_m: f64,
        geom: &TargetGeom,
        robot_vel_ms: &Vector2<f64>
    ) -> FiringSolution {
        let speed = self.table.speed_for_range(range_m);
        self.solve(speed, geom, robot_vel_ms)
    }

    /// Solve for a shot at the target with the given stationary launch speed.
    ///
    /// The stationary shot points along the bearing to the target. The
    /// robot's field velocity is rotated into that shot frame and subtracted
    /// to give the launch velocity the shooter must provide. If either vector
    /// is shorter than `min_vector_norm_ms` the heading offset is zero.
    pub fn solve(
        &self,
        stationary_speed_ms: f64,
        geom: &TargetGeom,
        robot_vel_ms: &Vector2<f64>
    ) -> FiringSolution {
        let bearing = geom.bearing_rad;

        if !bearing.is_finite() || !stationary_speed_ms.is_finite() {
            return FiringSolution {
                stationary_speed_ms: 0.0,
                launch_speed_ms: 0.0,
                heading_offset_rad: 0.0,
                heading_cmd_rad: 0.0,
            };
        }

        // A non-finite velocity reading is treated as stationary
        let robot_vel = if robot_vel_ms.iter().all(|v| v.is_finite()) {
            *robot_vel_ms
        }
        else {
            Vector2::zeros()
        };

        // Shot frame has +X along the bearing to the target
        let vel_shot = Rotation2::new(-bearing) * robot_vel;
        let stationary = Vector2::new(stationary_speed_ms, 0.0);
        let launch = stationary - vel_shot;

        let min_norm = self.params.min_vector_norm_ms;
        let heading_offset_rad = if stationary.norm() < min_norm || launch.norm() < min_norm {
            0.0
        }
        else {
            // The stationary shot lies along +X, so this is the signed angle
            // between the two vectors
            launch[1].atan2(launch[0])
        };

        let solution = FiringSolution {
            stationary_speed_ms,
            launch_speed_ms: launch.norm(),
            heading_offset_rad,
            heading_cmd_rad: wrap_to_pi(bearing + heading_offset_rad),
        };

        trace!("Firing solution: {:?}", solution);

        solution
    }
}
