//! Sequencer state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use super::*;
use comms_if::{
    eqpt::mech::MechDem,
    tc::{FireCmd, Landmark}
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Feed actions issued in order on entering `Feeding`, one per cycle.
const FEED_SEQUENCE: [MechDem; 4] = [
    MechDem::HopperFeed,
    MechDem::IndexerFeed,
    MechDem::IntakeRun,
    MechDem::IntakeAgitate,
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct Sequencer {
    params: Params,

    /// Current state
    state: SequencerState,

    /// The command being executed, if any
    active: Option<ActiveCmd>,

    /// Demands waiting to be issued on the next step
    pending: Vec<MechDem>,

    /// One-shot shooter velocity held outside of any command
    held_speed_ms: Option<f64>,

    report: StatusReport,
}

/// Inputs to a single sequencer step.
#[derive(Debug, Default, Copy, Clone)]
pub struct SeqInput {
    /// Launch speed from this cycle's live firing solution.
    ///
    /// Units: meters/second
    pub live_launch_speed_ms: f64,

    /// True if the target is within shooting range.
    pub in_range: bool,

    /// True if the shooter reports it is at or near its goal.
    pub shooter_at_goal: bool,

    /// True if the chassis is aligned to the firing heading.
    pub aligned: bool,

    /// Time since the previous step.
    ///
    /// Units: seconds
    pub dt_s: f64,
}

/// Status report for the sequencer.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct StatusReport {
    pub state: SequencerState,

    /// True if a live shot waiting for range is now in range
    pub armed: bool,

    /// Number of feed actions issued so far
    pub feed_step: usize,

    /// Time since the command started
    pub elapsed_s: f64,
}

/// A fire command with its parameters resolved.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub enum Shot {
    /// Use the live range and compensate for chassis motion.
    LiveRange {
        /// Don't spin up until the target is in range.
        wait_for_range: bool
    },

    /// Shoot as if from this range.
    FixedRange { range_m: f64 },

    /// Spin the shooter to this surface speed.
    ExplicitVelocity { speed_ms: f64 },

    /// Hold the shooter at the live launch speed without feeding.
    SpinUp,
}

struct ActiveCmd {
    cmd: FireCmd,
    shot: Shot,
    guard: TeardownGuard,
    timeout_s: Option<f64>,
    elapsed_s: f64,

    /// Added to a live launch speed by velocity nudges
    velocity_offset_ms: f64,

    /// False until a command waiting for range has seen the target in range
    armed: bool,

    /// Index of the next action in `FEED_SEQUENCE`
    feed_step: usize,

    agitate_elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// States of the sequencer. Each active state is handled by a `mode_xyz`
/// function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum SequencerState {
    Idle,
    WaitingForAlignment,
    Feeding,
    Firing,

    /// The command has ended and its teardown will be issued on the next
    /// step.
    Disabling,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            state: SequencerState::Idle,
            armed: false,
            feed_step: 0,
            elapsed_s: 0.0,
        }
    }
}

impl Shot {
    /// Resolve a fire command against the sequencer parameters.
    pub fn from_cmd(cmd: &FireCmd, params: &Params) -> Self {
        match *cmd {
            FireCmd::LiveRange => Shot::LiveRange { wait_for_range: false },
            FireCmd::LiveRangeWhenInRange => Shot::LiveRange { wait_for_range: true },
            FireCmd::FixedRange { range_m } => Shot::FixedRange { range_m },
            FireCmd::Landmark { landmark: Landmark::Hub } => Shot::FixedRange {
                range_m: params.hub_shot_range_m
            },
            FireCmd::Landmark { landmark: Landmark::Tower } => Shot::FixedRange {
                range_m: params.tower_shot_range_m
            },
            FireCmd::ExplicitVelocity { speed_ms } => Shot::ExplicitVelocity { speed_ms },
            FireCmd::SpinUp => Shot::SpinUp,
        }
    }

    /// True if the shot goes on to feed balls, and so needs the chassis
    /// aimed.
    pub fn feeds(&self) -> bool {
        !matches!(self, Shot::SpinUp)
    }
}

impl Sequencer {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            state: SequencerState::Idle,
            active: None,
            pending: Vec::new(),
            held_speed_ms: None,
            report: StatusReport::default(),
        }
    }

    /// Replace the parameters. An active landmark shot keeps the range it
    /// was started with.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// The resolved shot of the active command.
    pub fn shot(&self) -> Option<Shot> {
        self.active.as_ref().map(|a| a.shot)
    }

    /// The active command as it was requested.
    pub fn active_cmd(&self) -> Option<FireCmd> {
        self.active.as_ref().map(|a| a.cmd)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The one-shot shooter velocity being held, if any.
    pub fn held_shooter_speed_ms(&self) -> Option<f64> {
        self.held_speed_ms
    }

    /// Start a new fire command.
    ///
    /// An active command is torn down first, and its teardown is issued
    /// ahead of anything the new command demands.
    pub fn request(&mut self, cmd: FireCmd, timeout_s: Option<f64>) {
        if self.active.is_some() {
            info!("Fire command superseded");
            self.end_active();
        }

        let timeout_s = match timeout_s {
            Some(t) if !(t.is_finite() && t > 0.0) => {
                warn!("Ignoring invalid fire command timeout {}", t);
                None
            },
            t => t
        };

        let shot = Shot::from_cmd(&cmd, &self.params);
        let guard = if shot.feeds() {
            TeardownGuard::acquire()
        }
        else {
            TeardownGuard::acquire_shooter()
        };

        // The command takes over the shooter
        self.held_speed_ms = None;

        self.active = Some(ActiveCmd {
            cmd,
            shot,
            guard,
            timeout_s,
            elapsed_s: 0.0,
            velocity_offset_ms: 0.0,
            armed: !matches!(shot, Shot::LiveRange { wait_for_range: true }),
            feed_step: 0,
            agitate_elapsed_s: 0.0,
        });
        self.set_state(SequencerState::WaitingForAlignment);

        info!("Fire command started: {:?}", cmd);
    }

    /// Cancel the active command, if any. With no command active a held
    /// one-shot shooter velocity is stopped instead.
    pub fn cancel(&mut self) {
        if self.active.is_some() {
            info!("Fire command cancelled");
            self.end_active();
        }
        else if self.held_speed_ms.take().is_some() {
            info!("Shooter stopped");
            self.pending.push(MechDem::ShooterDisable);
        }
    }

    /// Give the shooter a one-shot velocity setpoint, ending any active
    /// command first.
    ///
    /// Returns false if the speed is invalid.
    pub fn set_shooter_velocity(&mut self, speed_ms: f64) -> bool {
        if !(speed_ms.is_finite() && speed_ms >= 0.0) {
            warn!("Ignoring invalid shooter velocity {}", speed_ms);
            return false;
        }

        if self.active.is_some() {
            info!("Fire command superseded by a shooter velocity");
            self.end_active();
        }

        self.pending.push(MechDem::ShooterGoalVelocity { speed_ms });
        self.held_speed_ms = Some(speed_ms);
        info!("Shooter velocity set to {:.3} m/s", speed_ms);

        true
    }

    /// Add to the shooter velocity setpoint.
    ///
    /// An explicit-velocity command has its speed changed. Live and spin-up
    /// commands carry the increment as an offset on the live launch speed. A
    /// held one-shot velocity is changed and re-issued on the next step.
    /// Fixed-range shots have no velocity setpoint to change.
    ///
    /// Returns false if nothing was changed.
    pub fn nudge_velocity(&mut self, increment_ms: f64) -> bool {
        if !increment_ms.is_finite() {
            warn!("Ignoring non-finite velocity nudge");
            return false;
        }

        let active = match self.active.as_mut() {
            Some(a) => a,
            None => {
                return match self.held_speed_ms {
                    Some(speed_ms) => {
                        let speed_ms = (speed_ms + increment_ms).max(0.0);
                        self.held_speed_ms = Some(speed_ms);
                        self.pending.push(MechDem::ShooterGoalVelocity { speed_ms });
                        debug!("Shooter velocity nudged to {:.3} m/s", speed_ms);
                        true
                    },
                    None => {
                        warn!("Velocity nudge ignored, the shooter has no setpoint");
                        false
                    }
                };
            }
        };

        match active.shot {
            Shot::ExplicitVelocity { ref mut speed_ms } => {
                *speed_ms = (*speed_ms + increment_ms).max(0.0);
                active.cmd = FireCmd::ExplicitVelocity { speed_ms: *speed_ms };
                debug!("Fire velocity nudged to {:.3} m/s", speed_ms);
                true
            },
            Shot::LiveRange { .. } | Shot::SpinUp => {
                active.velocity_offset_ms += increment_ms;
                debug!("Live velocity offset now {:.3} m/s", active.velocity_offset_ms);
                true
            },
            Shot::FixedRange { .. } => {
                warn!("Velocity nudge ignored, fixed range shots have no velocity setpoint");
                false
            }
        }
    }

    /// Advance the sequencer by one cycle, returning the demands to issue in
    /// order.
    pub fn step(&mut self, input: &SeqInput) -> Vec<MechDem> {
        let mut dems = std::mem::take(&mut self.pending);

        if self.state == SequencerState::Disabling {
            self.set_state(SequencerState::Idle);
        }

        let dt_s = if input.dt_s.is_finite() && input.dt_s > 0.0 {
            input.dt_s
        }
        else {
            0.0
        };

        let timed_out = match self.active.as_mut() {
            Some(a) => {
                a.elapsed_s += dt_s;
                matches!(a.timeout_s, Some(t) if a.elapsed_s >= t)
            },
            None => false
        };

        if timed_out {
            info!("Fire command complete");
            self.end_active();
        }
        else {
            match self.state {
                SequencerState::WaitingForAlignment => self.mode_waiting(input, &mut dems),
                SequencerState::Feeding => self.mode_feeding(input, dt_s, &mut dems),
                SequencerState::Firing => self.mode_firing(input, &mut dems),
                SequencerState::Idle | SequencerState::Disabling => ()
            }
        }

        self.update_report();

        dems
    }

    /// Spin up and wait for the shooter and chassis to be ready.
    fn mode_waiting(&mut self, input: &SeqInput, dems: &mut Vec<MechDem>) {
        let active = match self.active.as_mut() {
            Some(a) => a,
            None => return
        };

        if !active.armed {
            if !input.in_range {
                return;
            }
            active.armed = true;
            info!("Target in range, spinning up");
        }

        dems.push(shooter_dem(active, input));

        if active.shot.feeds() && input.shooter_at_goal && input.aligned {
            self.set_state(SequencerState::Feeding);
        }
    }

    /// Issue the feed actions one per cycle, then time the agitation pulse.
    fn mode_feeding(&mut self, input: &SeqInput, dt_s: f64, dems: &mut Vec<MechDem>) {
        let agitate_duration_s = self.params.agitate_duration_s;

        let active = match self.active.as_mut() {
            Some(a) => a,
            None => return
        };

        dems.push(shooter_dem(active, input));

        if let Some(dem) = FEED_SEQUENCE.get(active.feed_step) {
            dems.push(*dem);
            active.feed_step += 1;
            return;
        }

        active.agitate_elapsed_s += dt_s;
        if active.agitate_elapsed_s >= agitate_duration_s {
            // End the pulse with the intake still running
            dems.push(MechDem::IntakeRun);
            self.set_state(SequencerState::Firing);
        }
    }

    /// Hold the shooter setpoint until the command ends.
    fn mode_firing(&mut self, input: &SeqInput, dems: &mut Vec<MechDem>) {
        if let Some(a) = self.active.as_ref() {
            dems.push(shooter_dem(a, input));
        }
    }

    /// Release the active command's guard and queue its teardown.
    fn end_active(&mut self) {
        if let Some(active) = self.active.take() {
            self.pending.extend_from_slice(active.guard.release());
            self.set_state(SequencerState::Disabling);
        }
    }

    fn set_state(&mut self, state: SequencerState) {
        if self.state != state {
            debug!("Sequencer state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn update_report(&mut self) {
        self.report = match self.active.as_ref() {
            Some(a) => StatusReport {
                state: self.state,
                armed: a.armed,
                feed_step: a.feed_step,
                elapsed_s: a.elapsed_s,
            },
            None => StatusReport {
                state: self.state,
                ..StatusReport::default()
            }
        };
    }
}

/// The shooter setpoint demanded by a command this cycle.
fn shooter_dem(active: &ActiveCmd, input: &SeqInput) -> MechDem {
    match active.shot {
        Shot::LiveRange { .. } | Shot::SpinUp => MechDem::ShooterGoalVelocity {
            speed_ms: (input.live_launch_speed_ms + active.velocity_offset_ms).max(0.0)
        },
        Shot::FixedRange { range_m } => MechDem::ShooterGoalDistance { range_m },
        Shot::ExplicitVelocity { speed_ms } => MechDem::ShooterGoalVelocity { speed_ms },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DT: f64 = 0.02;

    fn ready() -> SeqInput {
        SeqInput {
            live_launch_speed_ms: 8.0,
            in_range: true,
            shooter_at_goal: true,
            aligned: true,
            dt_s: DT,
        }
    }

    fn not_ready() -> SeqInput {
        SeqInput {
            shooter_at_goal: false,
            ..ready()
        }
    }

    /// Step until the sequencer reaches `state`, collecting the demands.
    fn run_to(seq: &mut Sequencer, state: SequencerState) -> Vec<MechDem> {
        let mut dems = Vec::new();
        for _ in 0..100 {
            if seq.state() == state {
                return dems;
            }
            dems.extend(seq.step(&ready()));
        }
        panic!("Sequencer never reached {:?}", state);
    }

    fn count(dems: &[MechDem], dem: MechDem) -> usize {
        dems.iter().filter(|d| **d == dem).count()
    }

    #[test]
    fn test_waits_indefinitely_for_shooter() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, None);

        for _ in 0..1000 {
            let dems = seq.step(&not_ready());
            assert_eq!(seq.state(), SequencerState::WaitingForAlignment);
            assert_eq!(dems, vec![MechDem::ShooterGoalVelocity { speed_ms: 8.0 }]);
        }
    }

    #[test]
    fn test_needs_both_guards() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::FixedRange { range_m: 2.0 }, None);

        let mut input = ready();
        input.aligned = false;
        for _ in 0..10 {
            seq.step(&input);
        }
        assert_eq!(seq.state(), SequencerState::WaitingForAlignment);

        input.aligned = true;
        let dems = seq.step(&input);
        assert_eq!(dems, vec![MechDem::ShooterGoalDistance { range_m: 2.0 }]);
        assert_eq!(seq.state(), SequencerState::Feeding);
    }

    #[test]
    fn test_feed_order() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::ExplicitVelocity { speed_ms: 9.0 }, None);

        let dems: Vec<_> = run_to(&mut seq, SequencerState::Firing)
            .into_iter()
            .filter(|d| !d.is_shooter_setpoint())
            .collect();

        assert_eq!(dems, vec![
            MechDem::HopperFeed,
            MechDem::IndexerFeed,
            MechDem::IntakeRun,
            MechDem::IntakeAgitate,
            MechDem::IntakeRun,
        ]);
    }

    #[test]
    fn test_agitation_timed() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, None);

        // One cycle to leave waiting, four feed actions
        for _ in 0..5 {
            seq.step(&ready());
        }
        assert_eq!(seq.state(), SequencerState::Feeding);

        // 0.5 s of agitation at 50 Hz
        let mut n = 0;
        while seq.state() == SequencerState::Feeding {
            seq.step(&ready());
            n += 1;
            assert!(n < 100);
        }
        assert!(n >= 25 && n <= 26);
    }

    #[test]
    fn test_cancel_in_each_state() {
        for state in &[
            SequencerState::WaitingForAlignment,
            SequencerState::Feeding,
            SequencerState::Firing,
        ] {
            let mut seq = Sequencer::new(Params::default());
            seq.request(FireCmd::LiveRange, None);
            run_to(&mut seq, *state);

            seq.cancel();
            assert_eq!(seq.state(), SequencerState::Disabling);

            // Cancelling twice doesn't issue a second teardown
            seq.cancel();

            let mut after = Vec::new();
            for _ in 0..100 {
                after.extend(seq.step(&ready()));
            }

            assert_eq!(seq.state(), SequencerState::Idle);
            assert_eq!(after, TEARDOWN_DEMS.to_vec(), "cancelled in {:?}", state);
        }
    }

    #[test]
    fn test_supersede_tears_down_first() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, None);
        run_to(&mut seq, SequencerState::Firing);

        seq.request(FireCmd::Landmark { landmark: Landmark::Hub }, None);
        assert_eq!(seq.state(), SequencerState::WaitingForAlignment);

        let dems = seq.step(&not_ready());
        let mut expected = TEARDOWN_DEMS.to_vec();
        expected.push(MechDem::ShooterGoalDistance { range_m: 1.3 });
        assert_eq!(dems, expected);

        // Only the new command's spin-up afterwards
        let dems = seq.step(&not_ready());
        assert_eq!(dems, vec![MechDem::ShooterGoalDistance { range_m: 1.3 }]);
    }

    #[test]
    fn test_wait_for_range() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRangeWhenInRange, None);

        let mut input = ready();
        input.in_range = false;
        for _ in 0..50 {
            assert!(seq.step(&input).is_empty());
        }
        assert_eq!(seq.state(), SequencerState::WaitingForAlignment);
        assert!(!seq.report().armed);

        input.in_range = true;
        assert_eq!(seq.step(&input), vec![MechDem::ShooterGoalVelocity { speed_ms: 8.0 }]);

        // Stays armed when the range opens up again
        input.in_range = false;
        assert_eq!(seq.step(&input).len(), 2);
        assert!(seq.report().armed);
    }

    #[test]
    fn test_timeout() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, Some(1.0));

        let mut all = Vec::new();
        for _ in 0..49 {
            all.extend(seq.step(&not_ready()));
        }
        assert_eq!(seq.state(), SequencerState::WaitingForAlignment);

        seq.step(&not_ready());
        assert_eq!(seq.state(), SequencerState::Disabling);

        for _ in 0..10 {
            all.extend(seq.step(&not_ready()));
        }
        assert_eq!(seq.state(), SequencerState::Idle);
        for dem in TEARDOWN_DEMS.iter() {
            assert_eq!(count(&all, *dem), 1);
        }
    }

    #[test]
    fn test_nudge() {
        let mut seq = Sequencer::new(Params::default());
        assert!(!seq.nudge_velocity(1.0));

        seq.request(FireCmd::ExplicitVelocity { speed_ms: 9.0 }, None);
        assert!(seq.nudge_velocity(0.5));
        assert_eq!(seq.step(&not_ready()), vec![MechDem::ShooterGoalVelocity { speed_ms: 9.5 }]);
        assert_eq!(seq.active_cmd(), Some(FireCmd::ExplicitVelocity { speed_ms: 9.5 }));

        // Never negative
        seq.nudge_velocity(-20.0);
        assert_eq!(seq.shot(), Some(Shot::ExplicitVelocity { speed_ms: 0.0 }));

        // Fixed range shots only have a distance
        seq.request(FireCmd::FixedRange { range_m: 2.0 }, None);
        assert!(!seq.nudge_velocity(1.0));
        assert!(!seq.nudge_velocity(std::f64::NAN));
    }

    #[test]
    fn test_nudge_live_speed() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, None);

        assert!(seq.nudge_velocity(0.5));
        assert_eq!(seq.step(&not_ready()), vec![MechDem::ShooterGoalVelocity { speed_ms: 8.5 }]);

        // The offset follows the live speed
        let mut input = not_ready();
        input.live_launch_speed_ms = 6.0;
        assert_eq!(seq.step(&input), vec![MechDem::ShooterGoalVelocity { speed_ms: 6.5 }]);

        // A new command starts without an offset
        seq.request(FireCmd::SpinUp, None);
        assert_eq!(
            seq.step(&input).last(),
            Some(&MechDem::ShooterGoalVelocity { speed_ms: 6.0 })
        );
    }

    #[test]
    fn test_spin_up_never_feeds() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::SpinUp, None);

        for _ in 0..200 {
            assert_eq!(seq.step(&ready()), vec![MechDem::ShooterGoalVelocity { speed_ms: 8.0 }]);
            assert_eq!(seq.state(), SequencerState::WaitingForAlignment);
        }

        // Only the shooter is released
        seq.cancel();
        let mut after = Vec::new();
        for _ in 0..10 {
            after.extend(seq.step(&ready()));
        }
        assert_eq!(after, SHOOTER_TEARDOWN_DEMS.to_vec());
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn test_spin_up_superseded_by_shot() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::SpinUp, Some(5.0));
        seq.step(&ready());

        seq.request(FireCmd::LiveRange, None);
        assert_eq!(seq.step(&ready()), vec![
            MechDem::ShooterDisable,
            MechDem::ShooterGoalVelocity { speed_ms: 8.0 },
        ]);
        assert_eq!(seq.state(), SequencerState::Feeding);
    }

    #[test]
    fn test_set_shooter_velocity() {
        let mut seq = Sequencer::new(Params::default());
        assert!(!seq.set_shooter_velocity(-1.0));
        assert!(!seq.set_shooter_velocity(std::f64::INFINITY));

        assert!(seq.set_shooter_velocity(6.0));
        assert_eq!(seq.step(&ready()), vec![MechDem::ShooterGoalVelocity { speed_ms: 6.0 }]);
        assert_eq!(seq.state(), SequencerState::Idle);

        // Issued once, the shooter holds it
        assert!(seq.step(&ready()).is_empty());

        assert!(seq.nudge_velocity(1.0));
        assert_eq!(seq.step(&ready()), vec![MechDem::ShooterGoalVelocity { speed_ms: 7.0 }]);
        assert_eq!(seq.held_shooter_speed_ms(), Some(7.0));

        seq.cancel();
        assert_eq!(seq.step(&ready()), vec![MechDem::ShooterDisable]);
        assert_eq!(seq.held_shooter_speed_ms(), None);

        // Nothing left to stop
        seq.cancel();
        assert!(seq.step(&ready()).is_empty());
    }

    #[test]
    fn test_set_shooter_velocity_ends_command() {
        let mut seq = Sequencer::new(Params::default());
        seq.request(FireCmd::LiveRange, None);
        run_to(&mut seq, SequencerState::Firing);

        seq.set_shooter_velocity(5.0);
        assert!(!seq.is_active());

        let mut expected = TEARDOWN_DEMS.to_vec();
        expected.push(MechDem::ShooterGoalVelocity { speed_ms: 5.0 });
        assert_eq!(seq.step(&ready()), expected);
        assert_eq!(seq.state(), SequencerState::Idle);

        // A new command owns the shooter, cancelling it leaves nothing held
        seq.request(FireCmd::SpinUp, None);
        assert_eq!(seq.held_shooter_speed_ms(), None);
    }

    #[test]
    fn test_cancel_when_idle() {
        let mut seq = Sequencer::new(Params::default());
        seq.cancel();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(seq.step(&ready()).is_empty());
    }
}
