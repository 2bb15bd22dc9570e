//! # Telecommand module
//!
//! Telecommands are the instructions given to the fire control core by the
//! operator interface, autonomous routines, or command scripts. They are
//! exchanged as JSON objects tagged by a `type` field.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tc {
    /// Start a fire command, interrupting any active one.
    Fire {
        cmd: FireCmd,

        /// If set, the command completes normally after this many seconds.
        #[serde(default)]
        timeout_s: Option<f64>,
    },

    /// Cancel the active fire command.
    CancelFire,

    /// Add to the shooter velocity setpoint.
    NudgeFireVelocity { increment_ms: f64 },

    /// Set the shooter to a velocity once, ending any active fire command.
    SetShooterVelocity { speed_ms: f64 },

    /// Drive the chassis to the given field pose.
    Align {
        x_m: f64,
        y_m: f64,
        heading_rad: f64,
    },

    /// Cancel the active align command.
    CancelAlign,
}

/// The kind of fire command, with its parameter.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FireCmd {
    /// Sample the range to the target every cycle and compensate for the
    /// chassis' own motion.
    LiveRange,

    /// As `LiveRange`, but hold without spinning up until the target is
    /// within shooting range.
    LiveRangeWhenInRange,

    /// Shoot as if from a known range, ignoring the live range.
    FixedRange { range_m: f64 },

    /// Shoot from one of the named field landmarks.
    Landmark { landmark: Landmark },

    /// Spin the shooter to an explicit surface speed.
    ExplicitVelocity { speed_ms: f64 },

    /// Keep the shooter spun up for the live range without feeding. Only the
    /// shooter is disabled when it ends.
    SpinUp,
}

/// Field landmarks with calibrated shot distances.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Landmark {
    /// Shot taken against the hub.
    Hub,
    /// Shot taken from the tower.
    Tower,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON or an unknown TC: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {
    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise the TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}
