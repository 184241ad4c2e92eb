//! # Arm Executable
//!
//! Drives the arm from the command line. Given a command on its arguments the executable runs
//! that single command, e.g. `arm_exec axis gripper 30`, otherwise it opens a prompt where
//! commands are typed one per line:
//!
//! ```text
//! ARMBOT $ axis 1 120 5
//! ARMBOT $ wave
//! ARMBOT $ melody
//! ```
//!
//! The arm is attached at start up and detached on exit, and the final status of the arm is saved
//! into the session directory.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Hardware the arm is built on.
mod hw;

/// Parameters for the arm executable.
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use armbot::{ArmCmd, ArmStatus, ArmWorker};
use color_eyre::{eyre::WrapErr, Result};
use log::{info, warn};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use params::ArmExecParams;
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "ARMBOT $ ";

/// History file, relative to the software root.
const HISTORY_PATH: &str = "data/arm_history.txt";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "arm_exec", about = "Command the arm")]
struct Opt {
    /// Parameter file, relative to the params directory of the software root.
    #[structopt(long, default_value = "arm_exec.toml")]
    params: String,

    /// Run simulated motions and notes in real time.
    #[structopt(long)]
    real_time: bool,

    /// Log every single servo step.
    #[structopt(short, long)]
    verbose: bool,

    /// Command to run, opens a prompt if not given.
    #[structopt(subcommand)]
    cmd: Option<ArmCmd>,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = if opt.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Arm Executable\n");
    let uname = host::get_uname().wrap_err("Failed to get host information")?;
    info!(
        "Running on: {} ({} {}, {})",
        uname.nodename, uname.sysname, uname.release, uname.machine
    );
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let params: ArmExecParams = util::params::load(&opt.params)
        .wrap_err("Failed to load the arm parameters")?;

    info!("Parameters loaded");

    // ---- ARM INITIALISATION ----

    let worker = hw::build(&params, opt.real_time).wrap_err("Failed to build the arm")?;

    worker.execute(ArmCmd::Begin).wrap_err("Failed to begin the arm")?;

    info!("Initialisation complete");

    // ---- COMMANDS ----

    match opt.cmd {
        Some(cmd) => run(&worker, cmd),
        None => repl(&worker)?,
    }

    // ---- SHUTDOWN ----

    let status = worker.execute(ArmCmd::End).wrap_err("Failed to end the arm")?;
    session.save("arm_status.json", status);

    worker.shutdown();

    info!("End of session");
    session.exit();

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run one command and print the resulting status.
fn run(worker: &ArmWorker, cmd: ArmCmd) {
    info!("Executing {:?}", cmd);

    match worker.execute(cmd) {
        Ok(s) => print_status(&s),
        Err(e) => warn!("Command failed: {}", e),
    }
}

/// Read commands from the prompt until the user quits.
fn repl(worker: &ArmWorker) -> Result<()> {
    let mut rl = DefaultEditor::new().wrap_err("Failed to open the prompt")?;

    let history = history_path();
    if let Some(ref h) = history {
        if rl.load_history(h).is_err() {
            println!("No history detected");
        }
    }

    println!("Type a command, \"help\" for the list of commands or \"quit\" to exit");

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Prompt error: {}", e);
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line).ok();

        if line == "quit" || line == "exit" {
            break;
        }

        match ArmCmd::parse_line(line) {
            Ok(cmd) => run(worker, cmd),
            // Also carries the help text
            Err(e) => println!("{}", e.message),
        }
    }

    if let Some(ref h) = history {
        if let Err(e) = rl.save_history(h) {
            warn!("Couldn't save the command history: {}", e);
        }
    }

    Ok(())
}

fn print_status(status: &ArmStatus) {
    match serde_json::to_string_pretty(status) {
        Ok(s) => println!("{}", s),
        Err(e) => warn!("Couldn't format the arm status: {}", e),
    }
}

fn history_path() -> Option<PathBuf> {
    let mut path = host::get_armbot_sw_root().ok()?;
    path.push(HISTORY_PATH);

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).ok()?;
    }

    Some(path)
}
