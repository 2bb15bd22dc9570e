//! # Fire control sequencer module
//!
//! The sequencer moves balls from the hopper into the shooter once the
//! shooter is up to speed and the chassis is aimed at the target.
//!
//! A fire command runs through the following states:
//!
//! - `WaitingForAlignment`: the shooter is spun up, and the sequencer waits
//!   for the shooter to reach its goal while the chassis is aligned. It will
//!   wait here indefinitely.
//! - `Feeding`: the hopper, indexer and intake are started one at a time,
//!   followed by a timed agitation of the intake arm.
//! - `Firing`: everything keeps running until the command is cancelled,
//!   superseded, or times out.
//!
//! A spin-up command stays in `WaitingForAlignment` with the shooter at its
//! live setpoint and never feeds.
//!
//! Whichever way a command ends, every actuator it holds is disabled exactly
//! once. This is enforced by the [`TeardownGuard`] each active command owns,
//! which can only be released by value. Fire commands hold the whole ball
//! path, spin-up commands hold only the shooter.
//!
//! Outside of a command the shooter can be given a one-shot velocity
//! setpoint, which it holds until a command takes over or fire is cancelled.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod guard;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use guard::{TeardownGuard, SHOOTER_TEARDOWN_DEMS, TEARDOWN_DEMS};
pub use params::Params;
pub use state::*;
