//! Sequencer parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the fire control sequencer
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Length of the intake agitation pulse at the end of feeding.
    ///
    /// Units: seconds
    pub agitate_duration_s: f64,

    /// Calibrated range of a shot taken against the hub.
    ///
    /// Units: meters
    pub hub_shot_range_m: f64,

    /// Calibrated range of a shot taken from the tower.
    ///
    /// Units: meters
    pub tower_shot_range_m: f64,

    /// Maximum range a live shot may be taken from.
    ///
    /// Units: meters
    pub max_shooting_range_m: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            agitate_duration_s: 0.5,
            hub_shot_range_m: 1.3,
            tower_shot_range_m: 3.2,
            max_shooting_range_m: 5.0,
        }
    }
}
