//! # Data Store

use log::info;

use crate::{
    fire_ctrl::{self, FireCtrl, TickOutput},
    match_phase::{Alliance, MatchInfo, RobotMode},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Simulated match time since the start of autonomous
    pub sim_time_s: f64,

    // Match
    pub match_clock: MatchClock,

    // FireCtrl
    pub fire_ctrl: FireCtrl,
    pub fire_ctrl_output: TickOutput,
    pub fire_ctrl_status_rpt: fire_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

/// A simulated driver station match clock.
#[derive(Debug, Clone)]
pub struct MatchClock {
    /// Length of autonomous.
    ///
    /// Units: seconds
    pub auto_s: f64,

    /// Length of teleop.
    ///
    /// Units: seconds
    pub teleop_s: f64,

    /// Time after the start of teleop at which the game data is published,
    /// or `None` to never publish it.
    ///
    /// Units: seconds
    pub game_data_delay_s: Option<f64>,

    pub game_data: char,

    pub alliance: Option<Alliance>,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Default for MatchClock {
    fn default() -> Self {
        Self {
            auto_s: 20.0,
            teleop_s: 140.0,
            game_data_delay_s: Some(3.0),
            game_data: 'R',
            alliance: None,
        }
    }
}

impl MatchClock {
    /// The match state at `time_s` seconds after the start of autonomous.
    pub fn match_info(&self, time_s: f64) -> MatchInfo {
        let (mode, time_remaining_s) = if time_s < self.auto_s {
            (RobotMode::Autonomous, self.auto_s - time_s)
        }
        else if time_s < self.auto_s + self.teleop_s {
            (RobotMode::Teleop, self.auto_s + self.teleop_s - time_s)
        }
        else {
            (RobotMode::Disabled, 0.0)
        };

        let game_data = match self.game_data_delay_s {
            Some(d) if time_s >= self.auto_s + d => Some(self.game_data),
            _ => None
        };

        MatchInfo {
            mode,
            enabled: mode != RobotMode::Disabled,
            time_remaining_s,
            alliance: self.alliance,
            game_data,
        }
    }

    /// True once the match is over.
    pub fn is_finished(&self, time_s: f64) -> bool {
        time_s >= self.auto_s + self.teleop_s
    }
}

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_period_s: f64) {
        let cycles_per_s = (1.0 / cycle_period_s).round().max(1.0) as u128;
        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.fire_ctrl_output = TickOutput::default();

        self.sim_time_s = self.num_cycles as f64 * cycle_period_s;

        if self.is_1_hz_cycle {
            let info = self.match_clock.match_info(self.sim_time_s);
            if info.mode == RobotMode::Teleop
                && info.time_remaining_s.round() as u64 % 10 == 0
            {
                info!("Teleop time remaining: {:.0} s", info.time_remaining_s);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_match_clock() {
        let clock = MatchClock::default();

        let info = clock.match_info(5.0);
        assert_eq!(info.mode, RobotMode::Autonomous);
        assert_eq!(info.time_remaining_s, 15.0);
        assert_eq!(info.game_data, None);

        let info = clock.match_info(40.0);
        assert_eq!(info.mode, RobotMode::Teleop);
        assert_eq!(info.time_remaining_s, 120.0);
        assert_eq!(info.game_data, Some('R'));
        assert!(info.is_teleop_enabled());

        let info = clock.match_info(160.0);
        assert!(!info.enabled);
        assert!(clock.is_finished(160.0));
    }
}
