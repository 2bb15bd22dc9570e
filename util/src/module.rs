//! Cyclic module interface
//!
//! Anything stepped once per control cycle by an executive implements
//! [`State`]. Initialisation happens once per session, processing happens
//! once per cycle with the inputs sampled at the start of that cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module stepped by the executive's control loop.
pub trait State {
    /// Short name used in logs and archive paths.
    const NAME: &'static str;

    /// Data needed to bring the module up (usually a parameter file path).
    type InitData;
    type InitError;

    /// Inputs sampled once per cycle.
    type InputData;
    /// Demands produced by one cycle.
    type OutputData;
    /// Snapshot of the module after a cycle, suitable for archiving.
    type StatusReport;
    type ProcError;

    /// Bring the module up inside the given session.
    ///
    /// A module that fails to initialise must not be stepped.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one control cycle.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
