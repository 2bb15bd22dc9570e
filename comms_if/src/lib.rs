//! # Communications interface crate.
//!
//! Provides the command and equipment interfaces shared between the fire
//! control core and the drivers around it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod tc;

/// Demand and status definitions for equipment (like mechanisms)
pub mod eqpt;
