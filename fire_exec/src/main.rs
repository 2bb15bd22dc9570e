//! Main fire control executable entry point.
//!
//! # Architecture
//!
//! The executable runs the fire control executive against a simulated robot
//! and a simulated match clock. The general execution methodology consists
//! of:
//!
//!     - Initialise the session, logger and executive
//!     - Main loop:
//!         - Match clock and simulated sensor acquisition
//!         - Telecommand processing from the script
//!         - Fire control processing
//!         - Simulated robot update
//!         - Archiving
//!
//! # Modules
//!
//! All modules (e.g. `fire_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use fire_lib::{
    data_store::{DataStore, MatchClock},
    fire_ctrl::{FireCtrl, TickInput},
    intercept::RangeSpeedTable,
    loc::Pose,
    match_phase::{Alliance, ShiftWarning},
    sim::SimRobot,
};

mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use comms_if::eqpt::drive::DriveDem;
use log::{info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use util::{
    host,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingTcs},
    archive::Archived
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Fire control executable, running a simulated match.
#[derive(Debug, StructOpt)]
#[structopt(name = "fire_exec")]
struct Opts {
    /// Path to a TC script to execute.
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Parameter file, relative to the parameters directory.
    #[structopt(long, default_value = "fire_ctrl.toml")]
    params: String,

    /// Alliance the robot is on, `red` or `blue`. Defaults to blue.
    #[structopt(long, parse(try_from_str = parse_alliance))]
    alliance: Option<Alliance>,

    /// Game data character published shortly after the start of teleop.
    #[structopt(long, default_value = "R")]
    game_data: char,

    /// Never publish the game data.
    #[structopt(long)]
    no_game_data: bool,

    /// Pace the cycles in real time rather than running as fast as possible.
    #[structopt(long)]
    realtime: bool,

    /// Starting X position of the simulated robot, in meters.
    #[structopt(long, default_value = "2.0", allow_hyphen_values = true)]
    start_x: f64,

    /// Starting Y position of the simulated robot, in meters.
    #[structopt(long, default_value = "1.5", allow_hyphen_values = true)]
    start_y: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "fire_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Fire Control Executable\n");
    info!(
        "Software root: {:?}",
        host::get_sw_root().wrap_err("Failed to get the software root")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", &opts.script);

    let mut script = ScriptInterpreter::new(&opts.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script.get_duration(),
        script.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.match_clock = MatchClock {
        alliance: opts.alliance,
        game_data: opts.game_data,
        game_data_delay_s: if opts.no_game_data { None } else { Some(3.0) },
        ..MatchClock::default()
    };

    // ---- INITIALISE MODULES ----

    ds.fire_ctrl.init(opts.params.clone(), &session)
        .wrap_err_with(|| format!("Failed to initialise {}", FireCtrl::NAME))?;
    info!("{} init complete", FireCtrl::NAME);

    let cycle_period_s = ds.fire_ctrl.params().cycle_period_s;

    let mut sim = SimRobot::new(
        Pose::new(opts.start_x, opts.start_y, 0.0),
        ds.match_clock.alliance.unwrap_or_default(),
        RangeSpeedTable::new(&ds.fire_ctrl.params().intercept.range_speed_table)
    );
    info!("Simulated robot initialised at {:?}", sim.pose);

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut end_of_script = false;

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_period_s);

        if ds.match_clock.is_finished(ds.sim_time_s) {
            info!("End of match reached, stopping");
            break;
        }

        // ---- TELECOMMAND PROCESSING ----

        if !end_of_script {
            match script.get_pending_tcs(ds.sim_time_s) {
                PendingTcs::None => (),
                PendingTcs::Some(tc_vec) => {
                    for tc in tc_vec.iter() {
                        tc_processor::exec(&mut ds, tc);
                    }
                },
                // Let the match run out after the last TC
                PendingTcs::EndOfScript => {
                    info!("End of TC script reached");
                    end_of_script = true;
                }
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        let input = TickInput {
            pose: sim.pose,
            chassis_vel: sim.chassis_vel(),
            mech: sim.mech_status(),
            match_info: ds.match_clock.match_info(ds.sim_time_s),
            driver: DriveDem::stop(),
            measured_range_m: None,
        };

        let prev_phase = ds.fire_ctrl.phase();

        match ds.fire_ctrl.proc(&input) {
            Ok((o, r)) => {
                ds.fire_ctrl_output = o;
                ds.fire_ctrl_status_rpt = r;
            },
            Err(e) => match e {}
        }

        if ds.fire_ctrl.phase() != prev_phase {
            info!(
                "Match phase {:?} -> {:?}, hub active: {}",
                prev_phase,
                ds.fire_ctrl.phase(),
                ds.fire_ctrl_status_rpt.hub_active
            );
        }

        if ds.is_1_hz_cycle && ds.fire_ctrl.shift_warning() != ShiftWarning::None {
            info!(
                "Shift warning: {:?}, hub active: {}",
                ds.fire_ctrl.shift_warning(),
                ds.fire_ctrl.is_shared_structure_active()
            );
        }

        // ---- SIMULATION ----

        sim.step(&ds.fire_ctrl_output, input.driver, cycle_period_s);

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.fire_ctrl.write() {
            warn!("Could not archive FireCtrl status: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        if opts.realtime {
            let cycle_dur = Instant::now() - cycle_start_instant;

            // Get sleep duration
            match Duration::from_secs_f64(cycle_period_s)
                .checked_sub(cycle_dur)
            {
                Some(d) => {
                    ds.num_consec_cycle_overruns = 0;
                    thread::sleep(d);
                },
                None => {
                    warn!(
                        "Cycle overran by {:.06} s",
                        cycle_dur.as_secs_f64() - cycle_period_s
                    );
                    ds.num_consec_cycle_overruns += 1;
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!(
        "Simulated robot fired {} balls, finishing at {:?}",
        sim.balls_fired,
        sim.pose
    );
    info!("End of execution");

    Ok(())
}

/// Parse an alliance name from the command line.
fn parse_alliance(s: &str) -> Result<Alliance, Report> {
    match s.to_lowercase().as_str() {
        "red" => Ok(Alliance::Red),
        "blue" => Ok(Alliance::Blue),
        _ => Err(eyre!("Expected an alliance of \"red\" or \"blue\", found \"{}\"", s))
    }
}
