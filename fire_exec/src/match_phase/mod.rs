//! # Match phase module
//!
//! Classifies the match clock into the phases which decide whether the shared
//! scoring structure (the hub) is currently active for our alliance.
//!
//! During autonomous the hub is always active. Teleop opens with a transition
//! window in which both hubs are active, then four shifts alternate the
//! active hub between the alliances, and finally the endgame has both hubs
//! active again. Which alliance's hub is active in the first shift is
//! published as a single character of game data some time after autonomous.
//!
//! Everything here is a pure function of a [`MatchInfo`] snapshot, which the
//! caller builds from the driver station once per cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Shift boundaries of teleop, descending from the start of teleop.
///
/// Times are teleop time remaining in seconds.
pub const PHASE_WINDOWS: [PhaseWindow; 4] = [
    PhaseWindow { pre_warn_s: 135.0, boundary_s: 130.0 },
    PhaseWindow { pre_warn_s: 110.0, boundary_s: 105.0 },
    PhaseWindow { pre_warn_s: 85.0, boundary_s: 80.0 },
    PhaseWindow { pre_warn_s: 60.0, boundary_s: 55.0 },
];

/// Teleop time remaining at which the endgame starts.
pub const ENDGAME_S: f64 = 30.0;

/// Teleop time remaining at which the endgame warning starts.
pub const NEAR_ENDGAME_S: f64 = 35.0;

/// Width of the final second sub-window before each shift boundary.
pub const FINAL_SECOND_S: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single shift boundary and the start of its warning window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseWindow {
    /// Time remaining at which the warning before the boundary starts.
    pub pre_warn_s: f64,

    /// Time remaining at which the active hub changes.
    pub boundary_s: f64,
}

/// Snapshot of the match state, taken once per cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    /// The mode the robot is in.
    pub mode: RobotMode,

    /// True if the robot is enabled in that mode.
    pub enabled: bool,

    /// Time remaining in the current mode, counting down.
    ///
    /// Units: seconds
    pub time_remaining_s: f64,

    /// Alliance reported by the driver station, if known.
    pub alliance: Option<Alliance>,

    /// First character of the game-specific message, if one has been
    /// published.
    pub game_data: Option<char>,
}

/// Holds the first-active resolution for the duration of a match.
///
/// The game data is read once it is published and then held for the rest of
/// the match. The resolution is redone if the alliance changes. The latch is
/// cleared when a new match starts (entering autonomous), while the robot is
/// in disabled mode, and whenever the game data is absent.
#[derive(Debug, Default, Clone)]
pub struct FirstActiveLatch {
    value: FirstActive,
    /// Game data and alliance the current value was resolved from.
    resolved_from: Option<(char, Alliance)>,
    prev_mode: Option<RobotMode>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Alliance colours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alliance {
    Red,
    Blue,
}

/// Driver station robot modes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
    Test,
}

/// Whether our alliance's hub is active in the first shift.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FirstActive {
    /// No game data has been published yet.
    Unknown,

    /// Our hub is active in shifts 1 and 3.
    Ours,

    /// Our hub is active in shifts 2 and 4. Also the result of malformed game
    /// data.
    Theirs,
}

/// Named phase of the match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Not in a match mode, or disabled.
    Inactive,
    Autonomous,
    /// The start of teleop, both hubs active.
    Transition,
    /// The four alternating shifts.
    Shift1,
    Shift2,
    Shift3,
    Shift4,
    Endgame,
}

/// Warning level for haptic and visual feedback near phase changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ShiftWarning {
    None,
    /// Within the warning window before a shift boundary.
    ShiftApproaching,
    /// Within the final second before a shift boundary.
    ShiftFinalSecond,
    /// Within the warning window before the endgame.
    EndgameApproaching,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Alliance {
    fn default() -> Self {
        Alliance::Blue
    }
}

impl Alliance {
    /// Sign applied to driver-frame translation demands.
    ///
    /// The red driver station faces the opposite way down the field.
    pub fn translation_sign(&self) -> f64 {
        match self {
            Alliance::Red => -1.0,
            Alliance::Blue => 1.0,
        }
    }
}

impl Default for FirstActive {
    fn default() -> Self {
        FirstActive::Unknown
    }
}

impl FirstActive {
    /// Resolve from the game data character and our alliance.
    pub fn resolve(game_data: Option<char>, alliance: Alliance) -> Self {
        let first = match game_data {
            Some('B') => Alliance::Blue,
            Some('R') => Alliance::Red,
            Some(_) => return FirstActive::Theirs,
            None => return FirstActive::Unknown,
        };

        if first == alliance {
            FirstActive::Ours
        }
        else {
            FirstActive::Theirs
        }
    }

    /// True if our hub is known to be active first.
    ///
    /// Unknown resolves to false.
    pub fn is_ours(&self) -> bool {
        matches!(self, FirstActive::Ours)
    }
}

impl FirstActiveLatch {
    /// Update the latch with this cycle's match info and return the
    /// resolution.
    pub fn update(&mut self, info: &MatchInfo) -> FirstActive {
        let new_match = info.mode == RobotMode::Autonomous
            && self.prev_mode != Some(RobotMode::Autonomous);
        self.prev_mode = Some(info.mode);

        let game_data = match info.game_data {
            Some(c) if !new_match && info.mode != RobotMode::Disabled => c,
            _ => {
                self.clear();
                return self.value;
            }
        };

        let alliance = info.alliance();
        let stale = match self.resolved_from {
            Some((_, a)) => a != alliance,
            None => true,
        };

        if stale {
            self.value = FirstActive::resolve(Some(game_data), alliance);
            self.resolved_from = Some((game_data, alliance));
            info!(
                "First active hub resolved: {:?} (game data {:?}, {:?} alliance)",
                self.value, game_data, alliance
            );
        }

        self.value
    }

    fn clear(&mut self) {
        if self.resolved_from.is_some() {
            debug!("First active hub cleared");
        }
        self.value = FirstActive::Unknown;
        self.resolved_from = None;
    }

    pub fn get(&self) -> FirstActive {
        self.value
    }
}

impl MatchInfo {
    /// Our alliance, Blue if the driver station hasn't reported one.
    pub fn alliance(&self) -> Alliance {
        self.alliance.unwrap_or_default()
    }

    pub fn is_autonomous_enabled(&self) -> bool {
        self.mode == RobotMode::Autonomous && self.enabled
    }

    pub fn is_teleop_enabled(&self) -> bool {
        self.mode == RobotMode::Teleop && self.enabled
    }

    /// True if in teleop, whether or not enabled.
    pub fn is_teleop(&self) -> bool {
        self.mode == RobotMode::Teleop
    }

    pub fn is_autonomous(&self) -> bool {
        self.mode == RobotMode::Autonomous
    }

    /// True if the robot may act, in either autonomous or teleop.
    pub fn is_match_enabled(&self) -> bool {
        self.is_autonomous_enabled() || self.is_teleop_enabled()
    }

    /// Time remaining in autonomous, zero during teleop.
    pub fn auto_time_remaining_s(&self) -> f64 {
        if self.is_teleop() { 0.0 } else { self.time_remaining_s }
    }

    /// Time remaining in teleop, zero during autonomous.
    pub fn teleop_time_remaining_s(&self) -> f64 {
        if self.is_autonomous() { 0.0 } else { self.time_remaining_s }
    }

    /// The named phase of the match.
    ///
    /// A non-finite teleop clock gives `Transition`, in line with the hub
    /// being treated as active.
    pub fn phase(&self) -> Phase {
        if self.is_autonomous_enabled() {
            return Phase::Autonomous;
        }
        if !self.is_teleop_enabled() {
            return Phase::Inactive;
        }

        let t = self.time_remaining_s;
        if !t.is_finite() || t > PHASE_WINDOWS[0].boundary_s {
            Phase::Transition
        }
        else if t <= ENDGAME_S {
            Phase::Endgame
        }
        else {
            match shift_number(t) {
                1 => Phase::Shift1,
                2 => Phase::Shift2,
                3 => Phase::Shift3,
                _ => Phase::Shift4,
            }
        }
    }

    /// True within the warning window before any shift boundary, boundary
    /// included. The change into the endgame is not included.
    pub fn is_near_shift_change(&self) -> bool {
        self.is_teleop()
            && PHASE_WINDOWS.iter().any(|w| {
                let t = self.time_remaining_s;
                t <= w.pre_warn_s && t >= w.boundary_s
            })
    }

    /// As [`MatchInfo::is_near_shift_change`], excluding the final second.
    pub fn is_near_shift_change_excluding_final_second(&self) -> bool {
        self.is_teleop()
            && PHASE_WINDOWS.iter().any(|w| {
                let t = self.time_remaining_s;
                t <= w.pre_warn_s && t > w.boundary_s + FINAL_SECOND_S
            })
    }

    /// True within the final second before any shift boundary, both ends
    /// included.
    pub fn is_near_shift_change_final_second(&self) -> bool {
        self.is_teleop()
            && PHASE_WINDOWS.iter().any(|w| {
                let t = self.time_remaining_s;
                t <= w.boundary_s + FINAL_SECOND_S && t >= w.boundary_s
            })
    }

    pub fn is_near_endgame(&self) -> bool {
        self.is_teleop()
            && self.time_remaining_s <= NEAR_ENDGAME_S
            && self.time_remaining_s >= ENDGAME_S
    }

    pub fn is_endgame(&self) -> bool {
        self.is_teleop() && self.time_remaining_s <= ENDGAME_S
    }

    /// The combined warning level, final second taking priority.
    pub fn shift_warning(&self) -> ShiftWarning {
        if self.is_near_shift_change_final_second() {
            ShiftWarning::ShiftFinalSecond
        }
        else if self.is_near_shift_change_excluding_final_second() {
            ShiftWarning::ShiftApproaching
        }
        else if self.is_near_endgame() {
            ShiftWarning::EndgameApproaching
        }
        else {
            ShiftWarning::None
        }
    }
}

/// Get whether the shared scoring structure is active for our alliance.
///
/// - Always active when autonomous is enabled.
/// - Never active unless teleop is enabled.
/// - In teleop, active if the first-active alliance isn't known yet, since
///   that means it is early in the match. A non-finite clock is treated the
///   same way.
/// - Otherwise follows the shift table through [`shift_active`].
pub fn is_shared_structure_active(info: &MatchInfo, first_active: FirstActive) -> bool {
    if info.is_autonomous_enabled() {
        return true;
    }

    if !info.is_teleop_enabled() {
        return false;
    }

    if first_active == FirstActive::Unknown || !info.time_remaining_s.is_finite() {
        return true;
    }

    shift_active(info.time_remaining_s, first_active.is_ours())
}

/// Get whether our hub is active at teleop time remaining `t_s`, given
/// whether our alliance's hub is active first.
pub fn shift_active(t_s: f64, alliance_first_active: bool) -> bool {
    if t_s > PHASE_WINDOWS[0].boundary_s || t_s <= ENDGAME_S {
        return true;
    }

    // Odd shifts belong to the first-active alliance
    if shift_number(t_s) % 2 == 1 {
        alliance_first_active
    }
    else {
        !alliance_first_active
    }
}

/// Number of the shift containing `t_s`, for `ENDGAME_S < t_s <= 130`.
fn shift_number(t_s: f64) -> u8 {
    PHASE_WINDOWS.iter().filter(|w| t_s <= w.boundary_s).count() as u8
}
