//! Pose lock module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::f64::consts::PI;

// Internal
use super::*;
use crate::loc::Pose;
use crate::match_phase::Alliance;
use comms_if::eqpt::drive::DriveDem;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct PoseLock {
    params: Params,

    /// Alliance the robot is on, decides the translational mirroring
    alliance: Alliance,

    /// The pose currently being locked to
    target: Option<Pose>,

    x_ctrl: AxisController,
    y_ctrl: AxisController,
    head_ctrl: AxisController,

    /// Heading controller used while aiming at a firing heading
    aim_ctrl: AxisController,

    report: StatusReport,
}

/// The status report containing the axis errors and setpoint flags.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Field X error to the target pose
    pub x_error_m: f64,

    /// Field Y error to the target pose
    pub y_error_m: f64,

    /// Heading error to the target pose
    pub head_error_rad: f64,

    /// Heading error to the firing heading
    pub aim_error_rad: f64,

    /// True if all three pose axes are within tolerance
    pub at_setpoint: bool,

    /// True if the aim controller is within tolerance
    pub aimed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseLock {
    /// Create a new pose lock with no target.
    pub fn new(params: Params) -> Self {
        let x_ctrl = AxisController::new(&params.x);
        let y_ctrl = AxisController::new(&params.y);
        let head_ctrl = AxisController::new(&params.heading)
            .with_continuous_input(-PI, PI);
        let aim_ctrl = AxisController::new(&params.aim)
            .with_continuous_input(-PI, PI);

        Self {
            params,
            alliance: Alliance::default(),
            target: None,
            x_ctrl,
            y_ctrl,
            head_ctrl,
            aim_ctrl,
            report: StatusReport::default(),
        }
    }

    /// Replace the parameters.
    ///
    /// The new gains are applied on the next control evaluation, controller
    /// state is kept.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn set_alliance(&mut self, alliance: Alliance) {
        self.alliance = alliance;
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// The pose currently being locked to, if any.
    pub fn target(&self) -> Option<Pose> {
        self.target
    }

    /// Command a new target pose.
    ///
    /// All three axis controllers are reset so no integrator state carries
    /// over from the previous target.
    pub fn set_target(&mut self, target: Pose) {
        self.x_ctrl.reset();
        self.y_ctrl.reset();
        self.head_ctrl.reset();

        self.x_ctrl.set_setpoint(target.x());
        self.y_ctrl.set_setpoint(target.y());
        self.head_ctrl.set_setpoint(target.heading_rad);

        self.target = Some(target);
        self.report.at_setpoint = false;

        debug!(
            "Pose lock target set to ({:.3}, {:.3}, {:.3})",
            target.x(), target.y(), target.heading_rad
        );
    }

    /// Calculate the chassis demand which drives `current` towards `target`.
    ///
    /// A target different from the last one commanded resets the
    /// controllers. The demand is clamped to the translational and
    /// rotational ceilings, and the translational part is mirrored for the
    /// red alliance.
    pub fn align(&mut self, current: &Pose, target: &Pose, dt_s: f64) -> DriveDem {
        if self.target.as_ref() != Some(target) {
            self.set_target(*target);
        }

        if !current.is_finite() {
            return DriveDem::stop();
        }

        self.x_ctrl.set_gains(&self.params.x);
        self.y_ctrl.set_gains(&self.params.y);
        self.head_ctrl.set_gains(&self.params.heading);

        let vx = self.x_ctrl.calculate(current.x(), dt_s);
        let vy = self.y_ctrl.calculate(current.y(), dt_s);
        let rate = self.head_ctrl.calculate(current.heading_rad, dt_s);

        let max_trans = self.params.max_trans_ms;
        let max_rot = self.params.max_rot_rads;
        let sign = self.alliance.translation_sign();

        let dem = DriveDem {
            vx_ms: sign * vx.max(-max_trans).min(max_trans),
            vy_ms: sign * vy.max(-max_trans).min(max_trans),
            rate_rads: rate.max(-max_rot).min(max_rot),
        };

        self.report.x_error_m = self.x_ctrl.error().unwrap_or_default();
        self.report.y_error_m = self.y_ctrl.error().unwrap_or_default();
        self.report.head_error_rad = self.head_ctrl.error().unwrap_or_default();
        self.report.at_setpoint = self.is_at_setpoint();

        trace!("Pose lock demand: {:?}", dem);

        dem
    }

    /// True if all three axis errors are within their tolerances.
    pub fn is_at_setpoint(&self) -> bool {
        self.target.is_some()
            && self.x_ctrl.at_setpoint()
            && self.y_ctrl.at_setpoint()
            && self.head_ctrl.at_setpoint()
    }

    /// Stop locking to the target.
    ///
    /// Returns the zero demand which must be sent to the chassis so no stale
    /// actuation remains.
    pub fn stop(&mut self) -> DriveDem {
        if let Some(t) = self.target.take() {
            debug!(
                "Pose lock released at target ({:.3}, {:.3}, {:.3})",
                t.x(), t.y(), t.heading_rad
            );
        }

        self.x_ctrl.reset();
        self.y_ctrl.reset();
        self.head_ctrl.reset();
        self.report.at_setpoint = false;

        DriveDem::stop()
    }

    /// Start aiming at a new firing heading.
    pub fn begin_aim(&mut self) {
        self.aim_ctrl.reset();
        self.report.aimed = false;
    }

    /// Calculate the rotation rate turning the chassis from `heading_rad` to
    /// `heading_cmd_rad`, clamped to the rotational ceiling.
    pub fn aim(&mut self, heading_rad: f64, heading_cmd_rad: f64, dt_s: f64) -> f64 {
        self.aim_ctrl.set_gains(&self.params.aim);
        self.aim_ctrl.set_setpoint(heading_cmd_rad);

        let max_rot = self.params.max_rot_rads;
        let rate = self.aim_ctrl.calculate(heading_rad, dt_s)
            .max(-max_rot)
            .min(max_rot);

        self.report.aim_error_rad = self.aim_ctrl.error().unwrap_or_default();
        self.report.aimed = self.is_aimed();

        rate
    }

    /// True if the last aim error was within the aim tolerance.
    pub fn is_aimed(&self) -> bool {
        self.aim_ctrl.at_setpoint()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    const DT: f64 = 0.02;

    #[test]
    fn test_align_clamped_demand() {
        let mut pl = PoseLock::new(Params::default());

        let dem = pl.align(&Pose::new(0.0, 0.0, 0.0), &Pose::new(10.0, -0.5, 3.0), DT);

        // X saturates, Y doesn't, rotation saturates
        assert_abs_diff_eq!(dem.vx_ms, 1.2);
        assert_abs_diff_eq!(dem.vy_ms, -0.5);
        assert_abs_diff_eq!(dem.rate_rads, 2.0);
        assert!(!pl.is_at_setpoint());
    }

    #[test]
    fn test_red_alliance_mirrors_translation_only() {
        let mut blue = PoseLock::new(Params::default());
        let mut red = PoseLock::new(Params::default());
        red.set_alliance(Alliance::Red);

        let current = Pose::new(1.0, 1.0, 0.0);
        let target = Pose::new(1.5, 0.8, 0.4);
        let b = blue.align(&current, &target, DT);
        let r = red.align(&current, &target, DT);

        assert_abs_diff_eq!(r.vx_ms, -b.vx_ms);
        assert_abs_diff_eq!(r.vy_ms, -b.vy_ms);
        assert_abs_diff_eq!(r.rate_rads, b.rate_rads);
    }

    #[test]
    fn test_heading_across_seam() {
        let mut pl = PoseLock::new(Params::default());
        let target = Pose::new(0.0, 0.0, 179f64.to_radians());
        let dem = pl.align(&Pose::new(0.0, 0.0, (-179f64).to_radians()), &target, DT);

        // Short way round is clockwise
        assert!(dem.rate_rads < 0.0);
        assert!(pl.report().head_error_rad.abs() <= 2f64.to_radians() + 1e-9);
    }

    #[test]
    fn test_at_setpoint_requires_all_axes() {
        let mut pl = PoseLock::new(Params::default());
        let target = Pose::new(2.0, 3.0, 1.0);

        pl.align(&Pose::new(2.01, 3.01, 1.01), &target, DT);
        assert!(pl.is_at_setpoint());

        // Each axis out of tolerance on its own
        pl.align(&Pose::new(2.2, 3.01, 1.01), &target, DT);
        assert!(!pl.is_at_setpoint());
        pl.align(&Pose::new(2.01, 3.2, 1.01), &target, DT);
        assert!(!pl.is_at_setpoint());
        pl.align(&Pose::new(2.01, 3.01, 1.2), &target, DT);
        assert!(!pl.is_at_setpoint());
    }

    #[test]
    fn test_new_target_resets_controllers() {
        let mut params = Params::default();
        params.x.k_p = 0.0;
        params.x.k_i = 1.0;
        let mut pl = PoseLock::new(params);

        let current = Pose::new(0.0, 0.0, 0.0);
        for _ in 0..50 {
            pl.align(&current, &Pose::new(1.0, 0.0, 0.0), DT);
        }

        // First cycle on the new target only sees one step of integral
        let dem = pl.align(&current, &Pose::new(0.5, 0.0, 0.0), DT);
        assert_abs_diff_eq!(dem.vx_ms, 0.5 * DT, epsilon = 1e-12);
    }

    #[test]
    fn test_stop_commands_zero_motion() {
        let mut pl = PoseLock::new(Params::default());
        pl.align(&Pose::new(0.0, 0.0, 0.0), &Pose::new(1.0, 1.0, 1.0), DT);

        let dem = pl.stop();
        assert!(dem.is_stop());
        assert!(pl.target().is_none());
        assert!(!pl.is_at_setpoint());
    }

    #[test]
    fn test_live_gain_change() {
        let mut pl = PoseLock::new(Params::default());
        let current = Pose::new(0.0, 0.0, 0.0);
        let target = Pose::new(0.1, 0.0, 0.0);
        assert_abs_diff_eq!(pl.align(&current, &target, DT).vx_ms, 0.1, epsilon = 1e-12);

        let mut params = Params::default();
        params.x.k_p = 2.0;
        pl.set_params(params);
        assert_abs_diff_eq!(pl.align(&current, &target, DT).vx_ms, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_aim() {
        let mut pl = PoseLock::new(Params::default());
        pl.begin_aim();

        let rate = pl.aim(0.0, 0.5, DT);
        assert_abs_diff_eq!(rate, 0.5, epsilon = 1e-12);
        assert!(!pl.is_aimed());

        pl.aim(0.48, 0.5, DT);
        assert!(pl.is_aimed());
        assert!(pl.report().aimed);
    }
}
