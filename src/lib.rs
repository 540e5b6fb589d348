//! # School closings tracker
//!
//! Polls a remote XML feed of school-closing announcements and cross-references it against a
//! list of school names kept in a local ini file.
//!
//! The binary supports adding and removing tracked names, listing them, listing every closing
//! in the feed, and (by default) printing the closings that match a tracked name.
//!
//! Get started with using this in just a few lines of code:
//! <tt>
//! use clap::Parser;<br/>
//! use schoolclosings::{cli::Cli, run_app};<br/>
//!<br/>
//! fn main() {<br/>
//!     if let Err(e) = run_app(Cli::parse()) {<br/>
//!         eprintln!("Error: {}", e);<br/>
//!         std::process::exit(e.exit_code());<br/>
//!     }<br/>
//! }<br/>
//! </tt>

use std::io::{self, Write};

use crate::cfg::{ConfigStore, Settings};
use crate::cli::Cli;
use crate::errors::ClosingsError;

pub mod cfg;
pub mod cli;
pub mod document;
pub mod errors;
pub mod feed;
pub mod matcher;
pub mod network;
pub mod utils;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Runs one invocation of the tool.
///
/// Creates the config file when it is missing (unless `--no-create` is given), loads the
/// settings, initialises logging and then runs the mode selected on the command line.
///
/// # Arguments
///
/// * `args`: The parsed command line.
///
/// returns: Result<(), ClosingsError>
pub fn run_app(args: Cli) -> Result<(), ClosingsError> {
    let store = ConfigStore::new(&args.config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !args.no_create && store.ensure_exists()? {
        writeln!(out, "'{}' created with default settings.", store.path().display())?;
    }

    let settings = Settings::load(store.path())?;
    utils::init_logging(&settings, args.verbose)?;
    log::info!("{} application, v{}", CARGO_PKG_NAME.to_uppercase(), VERSION);

    cli::dispatch(&args, &store, &settings, &mut out)?;
    out.flush()?;
    Ok(())
}
