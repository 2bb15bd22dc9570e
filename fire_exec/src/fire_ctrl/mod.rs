//! # Fire control executive
//!
//! `FireCtrl` composes the four control components into a single periodic
//! cycle. Each call to [`FireCtrl::tick`] takes one snapshot of the robot's
//! sensors and the match state, and returns the chassis and mechanism demands
//! for that cycle.
//!
//! Commands (fire, cancel, align and so on) may be issued between ticks and
//! take effect on the next one. There is no parallelism inside the executive,
//! all state is advanced by `tick` alone.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while initialising the executive.
#[derive(Debug, thiserror::Error)]
pub enum FireCtrlInitError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(ParamsError),

    #[error("Could not open the status archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}
