//! Fire control executive state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::*;
use crate::{
    intercept::{FiringSolution, InterceptSolver},
    loc::{ChassisVel, Pose, TargetGeom},
    match_phase::{self, FirstActive, FirstActiveLatch, MatchInfo, Phase, ShiftWarning},
    pose_lock::PoseLock,
    sequencer::{SeqInput, Sequencer, SequencerState, Shot},
};
use comms_if::{
    eqpt::{drive::DriveDem, mech::{MechDem, MechStatus}},
    tc::FireCmd,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Fire control executive state
pub struct FireCtrl {
    params: FireCtrlParams,

    pose_lock: PoseLock,
    solver: InterceptSolver,
    sequencer: Sequencer,
    first_active: FirstActiveLatch,

    /// Target of the active align command
    align_target: Option<Pose>,

    /// True if a zero chassis demand must be sent on the next tick
    drive_stop_pending: bool,

    /// True if the aim controller had the chassis on the last tick
    aiming: bool,

    /// Match state seen on the most recent tick
    last_match: Option<MatchInfo>,

    /// Target range used on the most recent tick
    last_range_m: Option<f64>,

    report: StatusReport,
    arch_report: Archiver,
}

/// Snapshot of everything the executive reads in one cycle.
#[derive(Debug, Copy, Clone)]
pub struct TickInput {
    /// Current field pose of the robot.
    pub pose: Pose,

    /// Current chassis velocity.
    pub chassis_vel: ChassisVel,

    /// Mechanism status from the mechanisms driver.
    pub mech: MechStatus,

    /// Match state from the driver station.
    pub match_info: MatchInfo,

    /// The driver's own chassis demand, passed through for translation while
    /// a fire command is aiming the chassis.
    pub driver: DriveDem,

    /// Range to the target from the range sensor, if it has one. Valid
    /// readings replace the range derived from the pose.
    ///
    /// Units: meters
    pub measured_range_m: Option<f64>,
}

/// Demands produced by one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    /// Chassis demand, or `None` if the driver keeps control of the chassis.
    pub drive: Option<DriveDem>,

    /// Mechanism demands, to be executed in order.
    pub mech_dems: Vec<MechDem>,
}

/// Status report of the executive, archived once per cycle.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct StatusReport {
    pub seq_state: SequencerState,
    pub feed_step: usize,
    pub armed: bool,

    pub range_m: f64,
    pub bearing_rad: f64,
    pub in_range: bool,

    pub stationary_speed_ms: f64,
    pub launch_speed_ms: f64,
    pub heading_offset_rad: f64,
    pub heading_cmd_rad: f64,

    pub aim_error_rad: f64,
    pub aligned: bool,

    pub aligning: bool,
    pub x_error_m: f64,
    pub y_error_m: f64,
    pub head_error_rad: f64,
    pub at_setpoint: bool,

    pub hub_active: bool,
    pub first_active: FirstActive,
    pub phase: Phase,
    pub shift_warning: ShiftWarning,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            seq_state: SequencerState::Idle,
            feed_step: 0,
            armed: false,
            range_m: 0.0,
            bearing_rad: 0.0,
            in_range: false,
            stationary_speed_ms: 0.0,
            launch_speed_ms: 0.0,
            heading_offset_rad: 0.0,
            heading_cmd_rad: 0.0,
            aim_error_rad: 0.0,
            aligned: false,
            aligning: false,
            x_error_m: 0.0,
            y_error_m: 0.0,
            head_error_rad: 0.0,
            at_setpoint: false,
            hub_active: false,
            first_active: FirstActive::Unknown,
            phase: Phase::Inactive,
            shift_warning: ShiftWarning::None,
        }
    }
}

impl Default for FireCtrl {
    fn default() -> Self {
        Self::new(FireCtrlParams::default())
    }
}

impl State for FireCtrl {
    const NAME: &'static str = "fire_ctrl";

    type InitData = String;
    type InitError = FireCtrlInitError;

    type InputData = TickInput;
    type OutputData = TickOutput;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the executive.
    ///
    /// Expected init data is the path to the parameter file, relative to the
    /// parameters directory.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: FireCtrlParams = params::load(&init_data)
            .map_err(FireCtrlInitError::ParamLoadError)?;
        params.validate()
            .map_err(FireCtrlInitError::InvalidParams)?;

        *self = Self::new(params);

        self.arch_report = Archiver::from_path(session, format!("{}/status_report.csv", Self::NAME))
            .map_err(FireCtrlInitError::ArchiveError)?;

        Ok(())
    }

    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let output = self.tick(input_data);
        Ok((output, self.report))
    }
}

impl Archived for FireCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl FireCtrl {
    /// Create a new executive from an already validated parameter set.
    pub fn new(params: FireCtrlParams) -> Self {
        Self {
            pose_lock: PoseLock::new(params.pose_lock.clone()),
            solver: InterceptSolver::new(params.intercept.clone()),
            sequencer: Sequencer::new(params.sequencer.clone()),
            first_active: FirstActiveLatch::default(),
            align_target: None,
            drive_stop_pending: false,
            aiming: false,
            last_match: None,
            last_range_m: None,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            params,
        }
    }

    pub fn params(&self) -> &FireCtrlParams {
        &self.params
    }

    /// Replace the parameter set while running.
    ///
    /// Invalid parameters are rejected and the current set is kept. Valid
    /// ones take effect on the next tick without resetting any controller.
    pub fn set_params(&mut self, params: FireCtrlParams) -> Result<(), ParamsError> {
        params.validate()?;

        self.pose_lock.set_params(params.pose_lock.clone());
        self.solver.set_params(params.intercept.clone());
        self.sequencer.set_params(params.sequencer.clone());
        self.params = params;

        info!("Fire control parameters updated");

        Ok(())
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }

    pub fn seq_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn active_fire_cmd(&self) -> Option<FireCmd> {
        self.sequencer.active_cmd()
    }

    /// True if an align command is running.
    pub fn is_aligning(&self) -> bool {
        self.align_target.is_some()
    }

    // ---- COMMANDS ----

    /// Start a fire command, interrupting any active one.
    pub fn request_fire_cmd(&mut self, cmd: FireCmd, timeout_s: Option<f64>) {
        if let Some(reason) = invalid_fire_cmd(&cmd) {
            warn!("Rejected fire command {:?}: {}", cmd, reason);
            return;
        }

        if let Some(m) = self.last_match {
            if !m.is_match_enabled() {
                warn!("Rejected fire command {:?}: robot is disabled", cmd);
                return;
            }
        }

        self.sequencer.request(cmd, timeout_s);
        self.aiming = false;
    }

    /// Cancel the active fire command. Its teardown is issued on the next
    /// tick.
    pub fn cancel_fire_cmd(&mut self) {
        self.sequencer.cancel();
    }

    /// Add to the shooter velocity setpoint of the active fire command, or
    /// of a held one-shot velocity.
    pub fn nudge_fire_velocity(&mut self, increment_ms: f64) {
        self.sequencer.nudge_velocity(increment_ms);
    }

    /// Set the shooter to a velocity once, ending any active fire command.
    /// The shooter holds it until a fire command takes over or fire is
    /// cancelled.
    pub fn set_shooter_velocity(&mut self, speed_ms: f64) {
        if let Some(m) = self.last_match {
            if !m.is_match_enabled() {
                warn!("Rejected shooter velocity {}: robot is disabled", speed_ms);
                return;
            }
        }

        self.sequencer.set_shooter_velocity(speed_ms);
    }

    /// Drive the chassis to a field pose until it is at the setpoint.
    pub fn request_align(&mut self, target: Pose) {
        if !target.is_finite() {
            warn!("Rejected align command to a non-finite pose");
            return;
        }

        info!(
            "Aligning to ({:.3}, {:.3}, {:.3})",
            target.x(), target.y(), target.heading_rad
        );

        self.pose_lock.set_target(target);
        self.align_target = Some(target);
        self.drive_stop_pending = false;
    }

    /// Cancel the active align command, stopping the chassis on the next
    /// tick.
    pub fn cancel_align(&mut self) {
        if self.align_target.take().is_some() {
            info!("Align cancelled");
            self.stop_chassis();
        }
    }

    // ---- QUERIES ----

    /// True if the hub is active for our alliance, as of the last tick.
    pub fn is_shared_structure_active(&self) -> bool {
        match self.last_match {
            Some(m) => match_phase::is_shared_structure_active(&m, self.first_active.get()),
            None => false
        }
    }

    pub fn is_near_shift_change(&self) -> bool {
        self.last_match.map_or(false, |m| m.is_near_shift_change())
    }

    pub fn is_near_shift_change_excluding_final_second(&self) -> bool {
        self.last_match.map_or(false, |m| m.is_near_shift_change_excluding_final_second())
    }

    pub fn is_near_shift_change_final_second(&self) -> bool {
        self.last_match.map_or(false, |m| m.is_near_shift_change_final_second())
    }

    pub fn is_near_endgame(&self) -> bool {
        self.last_match.map_or(false, |m| m.is_near_endgame())
    }

    pub fn is_endgame(&self) -> bool {
        self.last_match.map_or(false, |m| m.is_endgame())
    }

    pub fn shift_warning(&self) -> ShiftWarning {
        self.last_match.map_or(ShiftWarning::None, |m| m.shift_warning())
    }

    pub fn phase(&self) -> Phase {
        self.last_match.map_or(Phase::Inactive, |m| m.phase())
    }

    /// True if the target was within shooting range on the last tick.
    pub fn is_within_shooting_range(&self) -> bool {
        match self.last_range_m {
            Some(r) => r <= self.params.sequencer.max_shooting_range_m,
            None => false
        }
    }

    // ---- CYCLIC PROCESSING ----

    /// Advance the executive by one control cycle.
    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        let dt_s = self.params.cycle_period_s;
        let info = input.match_info;

        self.pose_lock.set_alliance(info.alliance());
        let first_active = self.first_active.update(&info);
        self.last_match = Some(info);

        // Disabling the robot ends every command
        if !info.is_match_enabled() {
            if self.sequencer.is_active() || self.sequencer.held_shooter_speed_ms().is_some() {
                info!("Robot disabled, ending fire command");
                self.sequencer.cancel();
            }
            if self.align_target.is_some() {
                info!("Robot disabled, ending align");
                self.cancel_align();
            }
        }

        // ---- GEOMETRY ----

        if !input.pose.is_finite() {
            debug!("Pose is not finite, holding chassis demands at zero");
        }

        let geom = self.params.target.geom_from(&input.pose);
        let range_m = select_range(&geom, input.measured_range_m);
        self.last_range_m = if range_m.is_finite() { Some(range_m) } else { None };
        let in_range = self.is_within_shooting_range();

        let robot_vel = input.chassis_vel.field_relative(input.pose.heading_rad);
        let solution = self.firing_solution(range_m, &geom, &robot_vel);

        // ---- CHASSIS ----

        let mut aligned = false;
        let aim = self.sequencer.shot().map_or(false, |s| s.feeds());
        let was_aiming = std::mem::replace(&mut self.aiming, false);

        let drive = if let Some(target) = self.align_target {
            let dem = self.pose_lock.align(&input.pose, &target, dt_s);

            if self.pose_lock.is_at_setpoint() {
                info!("Align complete");
                self.align_target = None;
                Some(self.pose_lock.stop())
            }
            else {
                Some(dem)
            }
        }
        else if self.drive_stop_pending {
            self.drive_stop_pending = false;
            Some(DriveDem::stop())
        }
        else if aim {
            // Taking the chassis back starts a fresh aim
            if !was_aiming {
                self.pose_lock.begin_aim();
            }
            self.aiming = true;

            let rate_rads = self.pose_lock.aim(
                input.pose.heading_rad,
                solution.heading_cmd_rad,
                dt_s
            );
            aligned = self.pose_lock.is_aimed();

            Some(DriveDem {
                vx_ms: input.driver.vx_ms,
                vy_ms: input.driver.vy_ms,
                rate_rads,
            })
        }
        else {
            None
        };

        // ---- SEQUENCER ----

        let mech_dems = self.sequencer.step(&SeqInput {
            live_launch_speed_ms: solution.launch_speed_ms,
            in_range,
            shooter_at_goal: input.mech.shooter_at_goal,
            aligned,
            dt_s,
        });

        if !mech_dems.is_empty() {
            trace!("Mechanism demands: {:?}", mech_dems);
        }

        // ---- REPORT ----

        let hub_active = match_phase::is_shared_structure_active(&info, first_active);
        self.update_report(&geom, range_m, in_range, &solution, aligned, hub_active, first_active, &info);

        TickOutput { drive, mech_dems }
    }

    /// Solve for the active shot, or for a live shot if nothing is active.
    fn firing_solution(
        &self,
        live_range_m: f64,
        geom: &TargetGeom,
        robot_vel: &nalgebra::Vector2<f64>
    ) -> FiringSolution {
        match self.sequencer.shot() {
            Some(Shot::FixedRange { range_m }) =>
                self.solver.solve_for_range(range_m, geom, robot_vel),
            Some(Shot::ExplicitVelocity { speed_ms }) =>
                self.solver.solve(speed_ms, geom, robot_vel),
            Some(Shot::LiveRange { .. }) | Some(Shot::SpinUp) | None =>
                self.solver.solve_for_range(live_range_m, geom, robot_vel),
        }
    }

    /// Zero the chassis demand on the next tick.
    fn stop_chassis(&mut self) {
        self.pose_lock.stop();
        self.drive_stop_pending = true;
    }

    #[allow(clippy::too_many_arguments)]
    fn update_report(
        &mut self,
        geom: &TargetGeom,
        range_m: f64,
        in_range: bool,
        solution: &FiringSolution,
        aligned: bool,
        hub_active: bool,
        first_active: FirstActive,
        info: &MatchInfo
    ) {
        let seq = self.sequencer.report();
        let pl = self.pose_lock.report();

        self.report = StatusReport {
            seq_state: seq.state,
            feed_step: seq.feed_step,
            armed: seq.armed,
            range_m,
            bearing_rad: geom.bearing_rad,
            in_range,
            stationary_speed_ms: solution.stationary_speed_ms,
            launch_speed_ms: solution.launch_speed_ms,
            heading_offset_rad: solution.heading_offset_rad,
            heading_cmd_rad: solution.heading_cmd_rad,
            aim_error_rad: pl.aim_error_rad,
            aligned,
            aligning: self.align_target.is_some(),
            x_error_m: pl.x_error_m,
            y_error_m: pl.y_error_m,
            head_error_rad: pl.head_error_rad,
            at_setpoint: pl.at_setpoint,
            hub_active,
            first_active,
            phase: info.phase(),
            shift_warning: info.shift_warning(),
        };
    }
}

/// Pick the measured range if it is valid, otherwise the range from the pose.
fn select_range(geom: &TargetGeom, measured_range_m: Option<f64>) -> f64 {
    match measured_range_m {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => geom.range_m
    }
}

/// Get the reason a fire command can't be run, if any.
fn invalid_fire_cmd(cmd: &FireCmd) -> Option<&'static str> {
    match *cmd {
        FireCmd::FixedRange { range_m } if !(range_m.is_finite() && range_m > 0.0) =>
            Some("range must be positive and finite"),
        FireCmd::ExplicitVelocity { speed_ms } if !(speed_ms.is_finite() && speed_ms >= 0.0) =>
            Some("speed must be non-negative and finite"),
        _ => None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::match_phase::{Alliance, RobotMode};
    use crate::sequencer::TEARDOWN_DEMS;
    use approx::assert_abs_diff_eq;

    fn teleop(t: f64) -> MatchInfo {
        MatchInfo {
            mode: RobotMode::Teleop,
            enabled: true,
            time_remaining_s: t,
            alliance: Some(Alliance::Blue),
            game_data: Some('B'),
        }
    }

    /// Robot 2 m straight down the field from the hub, facing it.
    fn input() -> TickInput {
        let target = FireCtrlParams::default().target;
        TickInput {
            pose: Pose::new(target.x_m - 2.0, target.y_m, 0.0),
            chassis_vel: ChassisVel::default(),
            mech: MechStatus { shooter_at_goal: true, shooter_speed_ms: 7.1 },
            match_info: teleop(100.0),
            driver: DriveDem::stop(),
            measured_range_m: None,
        }
    }

    #[test]
    fn test_idle_leaves_driver_in_control() {
        let mut fc = FireCtrl::default();
        let out = fc.tick(&input());
        assert_eq!(out, TickOutput::default());
        assert_abs_diff_eq!(fc.report().range_m, 2.0, epsilon = 1e-12);
        assert!(fc.is_within_shooting_range());
    }

    #[test]
    fn test_full_shot() {
        let mut fc = FireCtrl::default();
        let mut inp = input();
        inp.driver = DriveDem { vx_ms: 0.4, vy_ms: -0.2, rate_rads: 1.0 };

        fc.request_fire_cmd(FireCmd::LiveRange, None);

        let mut dems = Vec::new();
        for _ in 0..50 {
            let out = fc.tick(&inp);

            // Driver keeps translation, rotation is aimed
            let drive = out.drive.unwrap();
            assert_eq!(drive.vx_ms, 0.4);
            assert_eq!(drive.vy_ms, -0.2);
            assert_abs_diff_eq!(drive.rate_rads, 0.0, epsilon = 1e-9);

            dems.extend(out.mech_dems);
        }
        assert_eq!(fc.seq_state(), SequencerState::Firing);

        // Stationary at 2 m the launch speed is straight off the table
        match dems[0] {
            MechDem::ShooterGoalVelocity { speed_ms } =>
                assert_abs_diff_eq!(speed_ms, 7.1, epsilon = 1e-9),
            d => panic!("Expected a shooter velocity first, found {:?}", d)
        }

        fc.cancel_fire_cmd();
        let out = fc.tick(&inp);
        assert_eq!(out.mech_dems, TEARDOWN_DEMS.to_vec());
        assert_eq!(out.drive, None);
    }

    #[test]
    fn test_not_aligned_holds() {
        let mut fc = FireCtrl::default();
        let mut inp = input();

        // Facing away from the hub
        inp.pose.heading_rad = 2.0;
        fc.request_fire_cmd(FireCmd::FixedRange { range_m: 3.0 }, None);

        for _ in 0..5 {
            let out = fc.tick(&inp);
            assert!(out.drive.unwrap().rate_rads < 0.0);
            assert_eq!(out.mech_dems, vec![MechDem::ShooterGoalDistance { range_m: 3.0 }]);
        }
        assert_eq!(fc.seq_state(), SequencerState::WaitingForAlignment);
        assert!(!fc.report().aligned);
    }

    #[test]
    fn test_disable_tears_down() {
        let mut fc = FireCtrl::default();
        let mut inp = input();
        fc.request_fire_cmd(FireCmd::LiveRange, None);
        fc.request_align(Pose::new(1.0, 1.0, 0.0));
        fc.tick(&inp);

        inp.match_info.enabled = false;
        let out = fc.tick(&inp);
        assert_eq!(out.mech_dems, TEARDOWN_DEMS.to_vec());
        assert_eq!(out.drive, Some(DriveDem::stop()));
        assert!(!fc.is_aligning());

        let out = fc.tick(&inp);
        assert_eq!(out, TickOutput::default());

        // Commands are refused while disabled
        fc.request_fire_cmd(FireCmd::LiveRange, None);
        assert_eq!(fc.active_fire_cmd(), None);
    }

    #[test]
    fn test_align_to_setpoint() {
        let mut fc = FireCtrl::default();
        let mut inp = input();
        let target = Pose::new(inp.pose.x() + 0.5, inp.pose.y(), 0.0);
        fc.request_align(target);

        let out = fc.tick(&inp);
        assert_abs_diff_eq!(out.drive.unwrap().vx_ms, 0.5, epsilon = 1e-12);
        assert!(fc.is_aligning());

        // Arrive at the target
        inp.pose = target;
        let out = fc.tick(&inp);
        assert_eq!(out.drive, Some(DriveDem::stop()));
        assert!(!fc.is_aligning());

        // Zero motion is only sent once
        assert_eq!(fc.tick(&inp).drive, None);
    }

    #[test]
    fn test_cancel_align_stops_once() {
        let mut fc = FireCtrl::default();
        let inp = input();
        fc.request_align(Pose::new(0.0, 0.0, 1.0));
        fc.tick(&inp);

        fc.cancel_align();
        fc.cancel_align();
        assert_eq!(fc.tick(&inp).drive, Some(DriveDem::stop()));
        assert_eq!(fc.tick(&inp).drive, None);
    }

    #[test]
    fn test_measured_range_override() {
        let mut fc = FireCtrl::default();
        let mut inp = input();

        inp.measured_range_m = Some(6.0);
        fc.tick(&inp);
        assert_eq!(fc.report().range_m, 6.0);
        assert!(!fc.is_within_shooting_range());

        inp.measured_range_m = Some(-1.0);
        fc.tick(&inp);
        assert_abs_diff_eq!(fc.report().range_m, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hub_queries() {
        let mut fc = FireCtrl::default();
        assert!(!fc.is_shared_structure_active());

        // Blue first and on blue: shift 2 is theirs
        fc.tick(&input());
        assert!(!fc.is_shared_structure_active());
        assert_eq!(fc.report().first_active, FirstActive::Ours);

        let mut inp = input();
        inp.match_info = teleop(108.0);
        fc.tick(&inp);
        assert!(fc.is_shared_structure_active());
        assert!(fc.is_near_shift_change());
        assert!(fc.is_near_shift_change_excluding_final_second());
        assert_eq!(fc.shift_warning(), ShiftWarning::ShiftApproaching);
        assert!(!fc.is_endgame());
        assert_eq!(fc.phase(), Phase::Shift1);
        assert_eq!(fc.report().phase, Phase::Shift1);
    }

    #[test]
    fn test_invalid_commands_rejected() {
        let mut fc = FireCtrl::default();
        fc.request_fire_cmd(FireCmd::FixedRange { range_m: std::f64::NAN }, None);
        fc.request_fire_cmd(FireCmd::ExplicitVelocity { speed_ms: -1.0 }, None);
        assert_eq!(fc.active_fire_cmd(), None);

        fc.request_align(Pose::new(std::f64::INFINITY, 0.0, 0.0));
        assert!(!fc.is_aligning());
    }

    #[test]
    fn test_live_param_change() {
        let mut fc = FireCtrl::default();

        let mut bad = FireCtrlParams::default();
        bad.cycle_period_s = -1.0;
        assert!(fc.set_params(bad).is_err());
        assert_eq!(fc.params().cycle_period_s, 0.02);

        let mut good = FireCtrlParams::default();
        good.sequencer.max_shooting_range_m = 1.0;
        assert!(fc.set_params(good).is_ok());
        fc.tick(&input());
        assert!(!fc.is_within_shooting_range());
    }

    #[test]
    fn test_aim_restarts_after_align() {
        let mut params = FireCtrlParams::default();
        params.pose_lock.aim.k_d = 0.5;
        let mut fc = FireCtrl::new(params);
        let mut inp = input();

        // Aim from off the firing heading so the aim controller has history
        fc.request_fire_cmd(FireCmd::FixedRange { range_m: 2.0 }, None);
        inp.pose.heading_rad = 0.3;
        fc.tick(&inp);

        // Align takes the chassis and finishes straight away
        inp.pose.heading_rad = 0.0;
        fc.request_align(inp.pose);
        assert_eq!(fc.tick(&inp).drive, Some(DriveDem::stop()));

        // On the firing heading there is nothing to correct, and no derivative
        // kick from before the align
        let rate = fc.tick(&inp).drive.unwrap().rate_rads;
        assert_abs_diff_eq!(rate, 0.0, epsilon = 1e-9);
        assert!(fc.report().aligned);
    }

    #[test]
    fn test_spin_up_leaves_chassis_to_driver() {
        let mut fc = FireCtrl::default();
        let mut inp = input();
        inp.pose.heading_rad = 2.0;

        fc.request_fire_cmd(FireCmd::SpinUp, None);
        for _ in 0..50 {
            let out = fc.tick(&inp);
            assert_eq!(out.drive, None);
            assert_eq!(out.mech_dems.len(), 1);
            assert!(out.mech_dems[0].is_shooter_setpoint());
        }
        assert_eq!(fc.seq_state(), SequencerState::WaitingForAlignment);

        fc.cancel_fire_cmd();
        assert_eq!(fc.tick(&inp).mech_dems, vec![MechDem::ShooterDisable]);
    }

    #[test]
    fn test_shooter_velocity() {
        let mut fc = FireCtrl::default();
        let mut inp = input();
        fc.tick(&inp);

        fc.set_shooter_velocity(6.0);
        fc.nudge_fire_velocity(0.5);
        assert_eq!(fc.tick(&inp).mech_dems, vec![
            MechDem::ShooterGoalVelocity { speed_ms: 6.0 },
            MechDem::ShooterGoalVelocity { speed_ms: 6.5 },
        ]);
        assert_eq!(fc.seq_state(), SequencerState::Idle);

        // Disabling the robot stops the shooter
        inp.match_info.enabled = false;
        assert_eq!(fc.tick(&inp).mech_dems, vec![MechDem::ShooterDisable]);

        fc.set_shooter_velocity(6.0);
        assert!(fc.tick(&inp).mech_dems.is_empty());
    }

    #[test]
    fn test_proc_matches_tick() {
        let mut fc = FireCtrl::default();
        let (out, report) = match fc.proc(&input()) {
            Ok(r) => r,
            Err(e) => match e {}
        };
        assert_eq!(out, TickOutput::default());
        assert_eq!(report.seq_state, SequencerState::Idle);
    }
}
