//! Fire control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use crate::{
    intercept::{self, range_table::TableError, RangeSpeedTable},
    loc::TargetSpec,
    pose_lock,
    sequencer
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The complete parameter set of the fire control executive.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FireCtrlParams {
    /// Period of the control cycle. Used as the time step of every
    /// controller.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Field position of the hub.
    pub target: TargetSpec,

    pub pose_lock: pose_lock::Params,

    pub intercept: intercept::Params,

    pub sequencer: sequencer::Params,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a parameter set is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("Cycle period must be positive and finite, found {0}")]
    InvalidCyclePeriod(f64),

    #[error("Target position is not finite")]
    InvalidTarget,

    #[error("Gains or tolerance of the {0} controller are negative or not finite")]
    InvalidGains(&'static str),

    #[error("The {0} ceiling must be positive and finite")]
    InvalidCeiling(&'static str),

    #[error("Invalid range to speed table: {0}")]
    InvalidTable(TableError),

    #[error("Minimum vector norm must be non-negative and finite")]
    InvalidMinNorm,

    #[error("Sequencer parameter {0} must be non-negative and finite")]
    InvalidSequencer(&'static str),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for FireCtrlParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.02,
            target: TargetSpec { x_m: 4.6, y_m: 4.0 },
            pose_lock: pose_lock::Params::default(),
            intercept: intercept::Params::default(),
            sequencer: sequencer::Params::default(),
        }
    }
}

impl FireCtrlParams {
    /// Check the parameters are usable by the control cycle.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.cycle_period_s.is_finite() && self.cycle_period_s > 0.0) {
            return Err(ParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        if !(self.target.x_m.is_finite() && self.target.y_m.is_finite()) {
            return Err(ParamsError::InvalidTarget);
        }

        let pl = &self.pose_lock;
        for (name, gains) in &[
            ("x", &pl.x),
            ("y", &pl.y),
            ("heading", &pl.heading),
            ("aim", &pl.aim)
        ] {
            if !gains.is_valid() {
                return Err(ParamsError::InvalidGains(*name));
            }
        }

        if !is_positive(pl.max_trans_ms) {
            return Err(ParamsError::InvalidCeiling("translational"));
        }
        if !is_positive(pl.max_rot_rads) {
            return Err(ParamsError::InvalidCeiling("rotational"));
        }

        RangeSpeedTable::validate(&self.intercept.range_speed_table)
            .map_err(ParamsError::InvalidTable)?;

        if !is_non_negative(self.intercept.min_vector_norm_ms) {
            return Err(ParamsError::InvalidMinNorm);
        }

        let seq = &self.sequencer;
        for (name, value) in &[
            ("agitate_duration_s", seq.agitate_duration_s),
            ("max_shooting_range_m", seq.max_shooting_range_m)
        ] {
            if !is_non_negative(*value) {
                return Err(ParamsError::InvalidSequencer(*name));
            }
        }

        // Landmark shots are fixed range shots, which need a positive range
        for (name, value) in &[
            ("hub_shot_range_m", seq.hub_shot_range_m),
            ("tower_shot_range_m", seq.tower_shot_range_m)
        ] {
            if !is_positive(*value) {
                return Err(ParamsError::InvalidSequencer(*name));
            }
        }

        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}
