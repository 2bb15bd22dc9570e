//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the equipment
//! drivers.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod mech;

pub mod drive;
