//! Intercept parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the intercept solver
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Calibrated stationary shot table, as `[range_m, speed_ms]` pairs with
    /// strictly increasing ranges.
    pub range_speed_table: Vec<[f64; 2]>,

    /// Vectors shorter than this are treated as zero when computing the
    /// heading offset.
    ///
    /// Units: meters/second
    pub min_vector_norm_ms: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            range_speed_table: vec![
                [1.0, 6.0],
                [2.0, 7.1],
                [3.0, 8.3],
                [4.0, 9.6],
                [5.5, 11.2],
            ],
            min_vector_norm_ms: 1e-6,
        }
    }
}
