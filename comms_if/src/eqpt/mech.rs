//! # Mechanisms Equipment Demands
//!
//! The fire control core never drives hardware directly. Each cycle it emits
//! an ordered list of discrete [`MechDem`]s which the mechanisms driver
//! executes in order, fire-and-forget.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Status reported by the mechanisms driver once per cycle.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct MechStatus {
    /// True if the shooter wheel is at or near its goal speed.
    pub shooter_at_goal: bool,

    /// Measured shooter surface speed.
    ///
    /// Units: meters/second
    pub shooter_speed_ms: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of the ball-path actuators.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ActId {
    /// Flywheel launching the ball.
    Shooter,
    /// Staging mechanism holding balls before the indexer.
    Hopper,
    /// Feed rollers moving staged balls into the shooter.
    Indexer,
    /// Ground intake and its agitating arm.
    Intake,
}

/// A single discrete demand on one of the ball-path actuators.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum MechDem {
    /// Spin the shooter to the given surface speed in meters/second.
    ShooterGoalVelocity { speed_ms: f64 },

    /// Spin the shooter to the speed the driver's own calibration gives for a
    /// shot from this range in meters.
    ShooterGoalDistance { range_m: f64 },

    /// Let the shooter coast to a stop.
    ShooterDisable,

    /// Release the staging mechanism.
    HopperFeed,
    HopperDisable,

    /// Run the feed rollers into the shooter.
    IndexerFeed,
    IndexerDisable,

    /// Run the intake inwards.
    IntakeRun,

    /// Pulse the intake arm to clear jams. Ended by the next `IntakeRun` or
    /// `IntakeDisable`.
    IntakeAgitate,
    IntakeDisable,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MechDem {
    /// The actuator this demand is addressed to.
    pub fn act_id(&self) -> ActId {
        match self {
            MechDem::ShooterGoalVelocity { .. }
            | MechDem::ShooterGoalDistance { .. }
            | MechDem::ShooterDisable => ActId::Shooter,
            MechDem::HopperFeed | MechDem::HopperDisable => ActId::Hopper,
            MechDem::IndexerFeed | MechDem::IndexerDisable => ActId::Indexer,
            MechDem::IntakeRun | MechDem::IntakeAgitate | MechDem::IntakeDisable => ActId::Intake,
        }
    }

    /// True if this demand puts its actuator into the disabled state.
    pub fn is_disable(&self) -> bool {
        matches!(
            self,
            MechDem::ShooterDisable
                | MechDem::HopperDisable
                | MechDem::IndexerDisable
                | MechDem::IntakeDisable
        )
    }

    /// True if this demand only sets the shooter's goal.
    pub fn is_shooter_setpoint(&self) -> bool {
        matches!(
            self,
            MechDem::ShooterGoalVelocity { .. } | MechDem::ShooterGoalDistance { .. }
        )
    }
}
