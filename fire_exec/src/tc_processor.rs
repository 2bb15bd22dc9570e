//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;

// Internal
use comms_if::tc::Tc;
use fire_lib::{data_store::DataStore, loc::Pose};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub(crate) fn exec(ds: &mut DataStore, tc: &Tc) {

    debug!("Executing TC: {:?}", tc);

    // Handle different Tcs
    match *tc {
        Tc::Fire { cmd, timeout_s } => {
            ds.fire_ctrl.request_fire_cmd(cmd, timeout_s)
        },
        Tc::CancelFire => {
            ds.fire_ctrl.cancel_fire_cmd()
        },
        Tc::NudgeFireVelocity { increment_ms } => {
            ds.fire_ctrl.nudge_fire_velocity(increment_ms)
        },
        Tc::SetShooterVelocity { speed_ms } => {
            ds.fire_ctrl.set_shooter_velocity(speed_ms)
        },
        Tc::Align { x_m, y_m, heading_rad } => {
            ds.fire_ctrl.request_align(Pose::new(x_m, y_m, heading_rad))
        },
        Tc::CancelAlign => {
            ds.fire_ctrl.cancel_align()
        }
    }

}
