//! # Intercept module
//!
//! Computes firing solutions which let the robot shoot while it is moving.
//!
//! A stationary shot at the target needs a launch velocity pointing along the
//! bearing to the target, with a speed taken from a calibrated range to speed
//! table. When the chassis is moving the ball leaves the robot with the
//! chassis velocity added on, so the robot's own velocity is subtracted from
//! the stationary shot to get the velocity the shooter must actually provide.
//! The angle between the two vectors is the heading offset the chassis must
//! turn through.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod range_table;
pub mod solver;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::Params;
pub use range_table::RangeSpeedTable;
pub use solver::*;
