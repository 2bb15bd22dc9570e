//! # Fire control library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to
//! access items defined inside the fire control crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - everything the executable carries from one cycle to the next
pub mod data_store;

/// Fire control executive - composes the control modules into one periodic cycle
pub mod fire_ctrl;

/// Intercept solver - compensates firing solutions for the robot's own motion
pub mod intercept;

/// Localisation types - field poses, chassis velocities and the target
pub mod loc;

/// Match phase classifier - decides whether the hub is active
pub mod match_phase;

/// Pose lock - drives the chassis to a field pose
pub mod pose_lock;

/// Fire control sequencer - feeds balls into the shooter
pub mod sequencer;

/// Simulated robot - a kinematic chassis and mechanisms model for the harness and tests
pub mod sim;
