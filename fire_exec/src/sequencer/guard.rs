//! Teardown guard for an active fire command

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::mech::MechDem;
use log::warn;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Demands which put every ball-path actuator into its disabled state.
pub const TEARDOWN_DEMS: [MechDem; 4] = [
    MechDem::ShooterDisable,
    MechDem::HopperDisable,
    MechDem::IndexerDisable,
    MechDem::IntakeDisable,
];

/// Demands which disable only the shooter.
pub const SHOOTER_TEARDOWN_DEMS: [MechDem; 1] = [MechDem::ShooterDisable];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Marks a fire command as holding some of the ball-path actuators.
///
/// The guard is consumed by [`TeardownGuard::release`], which returns the
/// demands disabling the actuators it holds. A guard dropped without being
/// released means actuation may have been left running, and is logged.
#[derive(Debug)]
pub struct TeardownGuard {
    dems: &'static [MechDem],
    released: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TeardownGuard {
    /// Hold the whole ball path.
    pub(crate) fn acquire() -> Self {
        Self { dems: &TEARDOWN_DEMS, released: false }
    }

    /// Hold the shooter only.
    pub(crate) fn acquire_shooter() -> Self {
        Self { dems: &SHOOTER_TEARDOWN_DEMS, released: false }
    }

    /// Release the actuators, returning the demands which disable them.
    pub fn release(mut self) -> &'static [MechDem] {
        self.released = true;
        self.dems
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!("Fire command dropped without disabling the ball path");
        }
    }
}
