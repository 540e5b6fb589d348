// file: bin.rs
// Purpose: Application using the schoolclosings package
// Description: Parses the command line and runs the selected mode.

use clap::Parser;
use schoolclosings::cli::Cli;
use schoolclosings::run_app;

fn main() {
    let args = Cli::parse();

    if let Err(e) = run_app(args) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
