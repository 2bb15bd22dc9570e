//! # Pose lock module
//!
//! Pose lock drives the chassis to a commanded field pose. It does this using
//! three independent PID controllers, one each for the field X position, the
//! field Y position and the heading. The heading controller treats its input
//! as continuous over `[-pi, pi)` so that a target just across the `±pi` seam
//! is reached by the short way round.
//!
//! The controller outputs are clamped to separate translational and
//! rotational ceilings. When the robot is on the red alliance the field is
//! mirrored from the driver's point of view, so the translational demands are
//! negated. Rotation is never mirrored.
//!
//! A fourth, separate heading controller is used to aim the chassis at a
//! firing heading while the driver keeps control of translation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod controllers;
pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::Params;
pub use state::*;
