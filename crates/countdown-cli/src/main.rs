//! `countdown`: render countdown, since and quote widgets from the command line.
//!
//! Reads event or quote rows from a JSON file (or stdin), resolves a widget
//! parameter against them and prints what the widget would show.

mod cli;
mod commands;
mod config;
mod input;

use std::process;

use clap::Parser;

fn main() {
    env_logger::init();

    let args = cli::Cli::parse();
    let exit_code = match commands::run(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}
