mod args;
mod vizzard;

use clap::Parser;
use env_logger::Env;
use log::debug;

use crate::args::Args;
use crate::vizzard::VizzardError;

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();
    debug!("args: {:?}", args);

    println!("========== The Vizzard: Election Analyzer ==========\n");

    match vizzard::run_analysis(&args) {
        Ok(()) => {}
        Err(VizzardError::FileNotFound { path }) => {
            eprintln!("Error: one or more input files not found ({})", path);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Unexpected error: {}", e);
            std::process::exit(1);
        }
    }
}
