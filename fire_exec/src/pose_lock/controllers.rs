//! # Axis controllers
//!
//! This module provides the PID controller used for each axis of pose lock,
//! including the wrap-aware error calculation of the heading axis.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::params::AxisGains;
use util::maths::input_modulus;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller for a single axis.
///
/// The controller owns its integrator and derivative memory. Commanding a new
/// target must go through [`AxisController::reset`] so nothing carries over
/// between unrelated commands.
#[derive(Debug, Serialize, Clone)]
pub struct AxisController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Absolute error at or below which the axis is at its setpoint
    tolerance: f64,

    /// The setpoint, in the same convention as the measurement
    setpoint: f64,

    /// Input range for continuous (wrapping) axes
    continuous: Option<(f64, f64)>,

    /// Error from the most recent calculation
    error: Option<f64>,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxisController {

    /// Create a new controller with the given gains and a zero setpoint.
    pub fn new(gains: &AxisGains) -> Self {
        Self {
            k_p: gains.k_p,
            k_i: gains.k_i,
            k_d: gains.k_d,
            tolerance: gains.tolerance,
            setpoint: 0.0,
            continuous: None,
            error: None,
            prev_error: None,
            integral: 0.0,
        }
    }

    /// Treat the input as continuous over `[min, max)`, where `min` and `max`
    /// are the same physical point.
    pub fn with_continuous_input(mut self, min: f64, max: f64) -> Self {
        self.continuous = Some((min, max));
        self.setpoint = self.wrap(self.setpoint);
        self
    }

    /// Update the gains and tolerance without touching the controller state.
    ///
    /// Called every cycle so that live parameter changes take effect on the
    /// next evaluation.
    pub fn set_gains(&mut self, gains: &AxisGains) {
        self.k_p = gains.k_p;
        self.k_i = gains.k_i;
        self.k_d = gains.k_d;
        self.tolerance = gains.tolerance;
    }

    /// Set the setpoint.
    ///
    /// On a continuous axis the setpoint is wrapped into the input range so it
    /// uses the same convention as the measurement.
    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = self.wrap(setpoint);
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    /// Clear the integrator and the error memory.
    pub fn reset(&mut self) {
        self.error = None;
        self.prev_error = None;
        self.integral = 0.0;
    }

    /// The error from the most recent calculation, or `None` if the
    /// controller hasn't seen a measurement since its last reset.
    pub fn error(&self) -> Option<f64> {
        self.error
    }

    /// True if the most recent error was within tolerance.
    ///
    /// A controller that hasn't seen a measurement is never at its setpoint.
    pub fn at_setpoint(&self) -> bool {
        match self.error {
            Some(e) => e.abs() <= self.tolerance,
            None => false
        }
    }

    /// Calculate the error between the setpoint and a measurement.
    ///
    /// On a continuous axis this is the shortest signed path from the
    /// measurement to the setpoint.
    pub fn calc_error(&self, measurement: f64) -> f64 {
        let error = self.setpoint - measurement;

        match self.continuous {
            Some((min, max)) => {
                let half_range = (max - min) / 2.0;
                input_modulus(error, -half_range, half_range)
            },
            None => error
        }
    }

    /// Get the controller output for the given measurement, `dt_s` seconds
    /// after the previous one.
    ///
    /// A non-finite measurement or output yields zero and leaves the
    /// controller state untouched.
    pub fn calculate(&mut self, measurement: f64, dt_s: f64) -> f64 {
        if !measurement.is_finite() {
            return 0.0;
        }

        let error = self.calc_error(measurement);

        // Without a usable time step neither the integral nor the derivative
        // can be updated, so only the proportional term acts.
        let dt = if dt_s.is_finite() && dt_s > 0.0 { Some(dt_s) } else { None };

        let integral = match dt {
            Some(t) => self.integral + error * t,
            None => self.integral
        };

        // No derivative on the first sample after a reset, it would spike.
        let deriv = match (self.prev_error, dt) {
            (Some(e), Some(t)) => (error - e) / t,
            _ => 0f64
        };

        let out =
            self.k_p * error
            + self.k_i * integral
            + self.k_d * deriv;

        if !out.is_finite() {
            return 0.0;
        }

        self.integral = integral;
        self.error = Some(error);
        self.prev_error = Some(error);

        out
    }

    fn wrap(&self, value: f64) -> f64 {
        match self.continuous {
            Some((min, max)) => input_modulus(value, min, max),
            None => value
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn gains(k_p: f64, k_i: f64, k_d: f64, tolerance: f64) -> AxisGains {
        AxisGains { k_p, k_i, k_d, tolerance }
    }

    #[test]
    fn test_wrapped_error() {
        let mut c = AxisController::new(&gains(1.0, 0.0, 0.0, 0.01))
            .with_continuous_input(-PI, PI);

        c.set_setpoint(179f64.to_radians());
        let out = c.calculate((-179f64).to_radians(), 0.02);

        // The error is -2 deg, not +358 deg
        let err = c.error().unwrap();
        assert!(err.abs() <= 2f64.to_radians() + 1e-9);
        assert_abs_diff_eq!(err, (-2f64).to_radians(), epsilon = 1e-9);
        assert_abs_diff_eq!(out, err, epsilon = 1e-12);
    }

    #[test]
    fn test_setpoint_wrapped_into_input_range() {
        let mut c = AxisController::new(&gains(1.0, 0.0, 0.0, 0.01))
            .with_continuous_input(-PI, PI);
        c.set_setpoint(1.5 * PI);
        assert_abs_diff_eq!(c.setpoint(), -0.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_axis_not_wrapped() {
        let mut c = AxisController::new(&gains(2.0, 0.0, 0.0, 0.01));
        c.set_setpoint(10.0);
        assert_abs_diff_eq!(c.calculate(-10.0, 0.02), 40.0);
    }

    #[test]
    fn test_pid_terms() {
        let mut c = AxisController::new(&gains(1.0, 10.0, 0.1, 0.01));
        c.set_setpoint(1.0);

        // First sample: P + I, no derivative
        let out = c.calculate(0.0, 0.1);
        assert_abs_diff_eq!(out, 1.0 + 10.0 * 0.1, epsilon = 1e-12);

        // Second sample: error 0.5, integral 0.15, derivative -5
        let out = c.calculate(0.5, 0.1);
        assert_abs_diff_eq!(out, 0.5 + 10.0 * 0.15 + 0.1 * -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_clears_integrator() {
        let mut c = AxisController::new(&gains(0.0, 1.0, 0.0, 0.01));
        c.set_setpoint(1.0);
        for _ in 0..10 {
            c.calculate(0.0, 0.1);
        }
        assert!(!c.at_setpoint());

        c.reset();
        assert_eq!(c.error(), None);
        assert_abs_diff_eq!(c.calculate(0.0, 0.1), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_at_setpoint() {
        let mut c = AxisController::new(&gains(1.0, 0.0, 0.0, 0.1));
        c.set_setpoint(1.0);

        // No measurement yet
        assert!(!c.at_setpoint());

        c.calculate(0.95, 0.02);
        assert!(c.at_setpoint());

        c.calculate(0.5, 0.02);
        assert!(!c.at_setpoint());
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut c = AxisController::new(&gains(1.0, 1.0, 1.0, 0.1));
        c.set_setpoint(1.0);

        assert_eq!(c.calculate(std::f64::NAN, 0.02), 0.0);
        assert_eq!(c.error(), None);

        // Zero dt leaves just the proportional term
        assert_abs_diff_eq!(c.calculate(0.0, 0.0), 1.0);

        // Gains changed mid-command keep the state
        c.set_gains(&gains(3.0, 0.0, 0.0, 0.1));
        assert_abs_diff_eq!(c.calculate(0.0, 0.0), 3.0);
    }
}
