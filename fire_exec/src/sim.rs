//! # Simulated robot
//!
//! A simple model of the robot used in place of the drive and mechanisms
//! drivers. The chassis is kinematic, following each drive demand exactly,
//! and the shooter wheel is a first order lag towards its goal speed.
//!
//! Every mechanism demand applied to the model is recorded so tests can check
//! the order and number of actuations.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::{drive::DriveDem, mech::{ActId, MechDem, MechStatus}};
use log::debug;
use nalgebra::Vector2;

use crate::{
    fire_ctrl::TickOutput,
    intercept::RangeSpeedTable,
    loc::{ChassisVel, Pose},
    match_phase::Alliance,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Time constant of the shooter wheel.
const SHOOTER_TIME_CONST_S: f64 = 0.25;

/// The shooter counts as at its goal within this fraction of the goal speed.
const SHOOTER_AT_GOAL_FRAC: f64 = 0.05;

/// Balls per second launched while the ball path is fully running.
const FIRE_RATE_HZ: f64 = 4.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct SimRobot {
    pub pose: Pose,
    pub alliance: Alliance,

    /// Field frame velocity
    vel_ms: Vector2<f64>,
    rate_rads: f64,

    /// Calibration used to turn a goal distance into a speed
    table: RangeSpeedTable,

    shooter_goal_ms: Option<f64>,
    shooter_speed_ms: f64,
    hopper_on: bool,
    indexer_on: bool,
    intake_on: bool,
    agitating: bool,

    /// Fractional balls launched, whole balls are counted in `balls_fired`
    fire_accum: f64,
    pub balls_fired: u32,

    /// Every mechanism demand applied, in order
    pub dems: Vec<MechDem>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimRobot {
    pub fn new(pose: Pose, alliance: Alliance, table: RangeSpeedTable) -> Self {
        Self {
            pose,
            alliance,
            vel_ms: Vector2::zeros(),
            rate_rads: 0.0,
            table,
            shooter_goal_ms: None,
            shooter_speed_ms: 0.0,
            hopper_on: false,
            indexer_on: false,
            intake_on: false,
            agitating: false,
            fire_accum: 0.0,
            balls_fired: 0,
            dems: Vec::new(),
        }
    }

    /// Current chassis velocity in the field frame.
    pub fn chassis_vel(&self) -> ChassisVel {
        ChassisVel::field(self.vel_ms[0], self.vel_ms[1], self.rate_rads)
    }

    pub fn mech_status(&self) -> MechStatus {
        let shooter_at_goal = match self.shooter_goal_ms {
            Some(g) if g > 0.0 =>
                (self.shooter_speed_ms - g).abs() <= SHOOTER_AT_GOAL_FRAC * g,
            _ => false
        };

        MechStatus {
            shooter_at_goal,
            shooter_speed_ms: self.shooter_speed_ms,
        }
    }

    /// True if the given actuator is currently running.
    pub fn is_running(&self, act: ActId) -> bool {
        match act {
            ActId::Shooter => self.shooter_goal_ms.is_some(),
            ActId::Hopper => self.hopper_on,
            ActId::Indexer => self.indexer_on,
            ActId::Intake => self.intake_on || self.agitating,
        }
    }

    /// Apply one cycle of demands and advance the model by `dt_s`.
    ///
    /// When the executive leaves the chassis to the driver, `driver` is
    /// applied instead.
    pub fn step(&mut self, output: &TickOutput, driver: DriveDem, dt_s: f64) {
        for dem in output.mech_dems.iter() {
            self.apply_mech_dem(*dem);
        }

        let drive = output.drive.unwrap_or(driver);

        // Drive demands are in the driver's frame
        let sign = self.alliance.translation_sign();
        self.vel_ms = Vector2::new(sign * drive.vx_ms, sign * drive.vy_ms);
        self.rate_rads = drive.rate_rads;

        self.pose = Pose::new(
            self.pose.x() + self.vel_ms[0] * dt_s,
            self.pose.y() + self.vel_ms[1] * dt_s,
            self.pose.heading_rad + self.rate_rads * dt_s,
        );

        let goal = self.shooter_goal_ms.unwrap_or(0.0);
        let alpha = (dt_s / SHOOTER_TIME_CONST_S).min(1.0);
        self.shooter_speed_ms += alpha * (goal - self.shooter_speed_ms);

        if self.hopper_on && self.indexer_on && self.mech_status().shooter_at_goal {
            self.fire_accum += FIRE_RATE_HZ * dt_s;
            while self.fire_accum >= 1.0 {
                self.fire_accum -= 1.0;
                self.balls_fired += 1;
                debug!("Sim: ball fired at {:.2} m/s", self.shooter_speed_ms);
            }
        }
    }

    fn apply_mech_dem(&mut self, dem: MechDem) {
        self.dems.push(dem);

        match dem {
            MechDem::ShooterGoalVelocity { speed_ms } => self.shooter_goal_ms = Some(speed_ms),
            MechDem::ShooterGoalDistance { range_m } =>
                self.shooter_goal_ms = Some(self.table.speed_for_range(range_m)),
            MechDem::ShooterDisable => self.shooter_goal_ms = None,
            MechDem::HopperFeed => self.hopper_on = true,
            MechDem::HopperDisable => self.hopper_on = false,
            MechDem::IndexerFeed => self.indexer_on = true,
            MechDem::IndexerDisable => self.indexer_on = false,
            MechDem::IntakeRun => {
                self.intake_on = true;
                self.agitating = false;
            },
            MechDem::IntakeAgitate => self.agitating = true,
            MechDem::IntakeDisable => {
                self.intake_on = false;
                self.agitating = false;
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        fire_ctrl::{FireCtrl, FireCtrlParams, TickInput},
        match_phase::{MatchInfo, RobotMode},
        sequencer::{SequencerState, TEARDOWN_DEMS},
    };
    use comms_if::tc::FireCmd;

    fn teleop(alliance: Alliance) -> MatchInfo {
        MatchInfo {
            mode: RobotMode::Teleop,
            enabled: true,
            time_remaining_s: 120.0,
            alliance: Some(alliance),
            game_data: Some('R'),
        }
    }

    fn run(
        fc: &mut FireCtrl,
        sim: &mut SimRobot,
        driver: DriveDem,
        cycles: usize
    ) {
        let dt = fc.params().cycle_period_s;
        for _ in 0..cycles {
            let input = TickInput {
                pose: sim.pose,
                chassis_vel: sim.chassis_vel(),
                mech: sim.mech_status(),
                match_info: teleop(sim.alliance),
                driver,
                measured_range_m: None,
            };
            let out = fc.tick(&input);
            sim.step(&out, driver, dt);
        }
    }

    fn sim_robot(params: &FireCtrlParams, alliance: Alliance) -> SimRobot {
        SimRobot::new(
            Pose::new(2.0, 1.5, 0.0),
            alliance,
            RangeSpeedTable::new(&params.intercept.range_speed_table)
        )
    }

    #[test]
    fn test_shoot_while_moving() {
        let mut params = FireCtrlParams::default();

        // Stiff enough to track the bearing while strafing
        params.pose_lock.aim.k_p = 4.0;

        let mut fc = FireCtrl::new(params.clone());
        let mut sim = sim_robot(&params, Alliance::Blue);

        fc.request_fire_cmd(FireCmd::LiveRange, None);

        // Strafe slowly across the hub
        let driver = DriveDem { vx_ms: 0.0, vy_ms: 0.2, rate_rads: 0.0 };
        run(&mut fc, &mut sim, driver, 250);

        assert_eq!(fc.seq_state(), SequencerState::Firing);
        assert!(sim.balls_fired > 0);
        assert!(sim.is_running(ActId::Hopper));

        fc.cancel_fire_cmd();
        run(&mut fc, &mut sim, driver, 10);

        assert!(!sim.is_running(ActId::Shooter));
        assert!(!sim.is_running(ActId::Hopper));
        assert!(!sim.is_running(ActId::Indexer));
        assert!(!sim.is_running(ActId::Intake));

        // Exactly one teardown, and it is the last thing the model saw
        let tail = &sim.dems[sim.dems.len() - TEARDOWN_DEMS.len()..];
        assert_eq!(tail, &TEARDOWN_DEMS[..]);
        for dem in TEARDOWN_DEMS.iter() {
            assert_eq!(sim.dems.iter().filter(|d| *d == dem).count(), 1);
        }
    }

    #[test]
    fn test_align_on_red_alliance() {
        let params = FireCtrlParams::default();
        let mut fc = FireCtrl::new(params.clone());
        let mut sim = sim_robot(&params, Alliance::Red);

        let target = Pose::new(2.5, 1.2, 0.6);
        fc.request_align(target);
        run(&mut fc, &mut sim, DriveDem::stop(), 500);

        assert!(!fc.is_aligning());
        assert!((sim.pose.x() - target.x()).abs() <= params.pose_lock.x.tolerance);
        assert!((sim.pose.y() - target.y()).abs() <= params.pose_lock.y.tolerance);
        assert!((sim.pose.heading_rad - target.heading_rad).abs() <= params.pose_lock.heading.tolerance);

        // Chassis left stopped
        assert_eq!(sim.chassis_vel().vel_ms, Vector2::zeros());
    }
}
