// file: cli.rs
// Purpose: Command line arguments and the dispatch of each mode.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cfg::{ConfigStore, Settings, DEFAULT_CONFIG_FILE};
use crate::document::FeedSnapshot;
use crate::errors::ClosingsError;
use crate::matcher::MatchReport;
use crate::{feed, network};

#[derive(Parser, Debug, Default)]
#[command(version, about = "Manage school names in config and fetch status.")]
pub struct Cli {
    /// Add a school name to config
    #[arg(long, value_name = "NAME")]
    pub add: Option<String>,

    /// Remove a school name from config
    #[arg(long, value_name = "NAME")]
    pub remove: Option<String>,

    /// Show current school names in config
    #[arg(long)]
    pub show: bool,

    /// Show all schools from the feed
    #[arg(long)]
    pub all: bool,

    /// Path of the config file holding the school names
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Do not create the config file when it is missing
    #[arg(long)]
    pub no_create: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Mode<'a> {
    Add(&'a str),
    Remove(&'a str),
    Show,
    ShowAll,
    Check,
}

impl Cli {
    /// The first flag present wins, in the order add, remove, show, all.
    /// Empty names count as absent.
    pub fn mode(&self) -> Mode<'_> {
        if let Some(name) = self.add.as_deref().filter(|name| !name.is_empty()) {
            return Mode::Add(name);
        }
        if let Some(name) = self.remove.as_deref().filter(|name| !name.is_empty()) {
            return Mode::Remove(name);
        }
        if self.show {
            return Mode::Show;
        }
        if self.all {
            return Mode::ShowAll;
        }
        Mode::Check
    }
}

pub fn dispatch<W: Write>(
    args: &Cli,
    store: &ConfigStore,
    settings: &Settings,
    out: &mut W,
) -> Result<(), ClosingsError> {
    let mode = args.mode();
    info!("Running in mode {:?}", mode);
    match mode {
        Mode::Add(name) => {
            store.add_name(name)?;
            writeln!(out, "Added '{}' to config.", name)?;
        }
        Mode::Remove(name) => {
            store.remove_name(name)?;
            writeln!(out, "Removed '{}' from config.", name)?;
        }
        Mode::Show => show_schools(&store.read_names()?, out)?,
        Mode::ShowAll => {
            let snapshot = fetch_snapshot(settings)?;
            show_all_schools(&snapshot, out)?;
        }
        Mode::Check => {
            let school_names = store.read_names()?;
            let snapshot = fetch_snapshot(settings)?;
            check_closings(&snapshot, &school_names, out)?;
        }
    }
    Ok(())
}

pub fn fetch_snapshot(settings: &Settings) -> Result<FeedSnapshot, ClosingsError> {
    let client = network::make_http_client(settings)?;
    let body = network::http_get_binary(&settings.feed_url, &client)?;
    feed::parse_feed_bytes(&body)
}

pub fn show_schools<W: Write>(school_names: &[String], out: &mut W) -> Result<(), ClosingsError> {
    writeln!(out, "Current schools in config:")?;
    for name in school_names {
        writeln!(out, " - {}", name)?;
    }
    Ok(())
}

pub fn show_all_schools<W: Write>(snapshot: &FeedSnapshot, out: &mut W) -> Result<(), ClosingsError> {
    writeln!(out, "All schools from the feed:")?;
    for record in &snapshot.records {
        writeln!(out, "{}", record)?;
    }
    Ok(())
}

/// Prints the matching closings, or the "No Closings" line with the feed's run date.
pub fn check_closings<W: Write>(
    snapshot: &FeedSnapshot,
    school_names: &[String],
    out: &mut W,
) -> Result<(), ClosingsError> {
    let report = MatchReport::build(snapshot, school_names);
    for record in &report.matches {
        writeln!(out, "{}", record)?;
    }
    if !report.found_closing() {
        writeln!(out, "No Closings for you today! - {}", report.run_date)?;
    }
    Ok(())
}
