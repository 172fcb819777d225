// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for driving simulated GPIO pins.

use clap::Parser;
use std::process::ExitCode;

mod common;
mod get;
mod init;
mod logger;
mod panel;
mod set;
mod timer;
mod toggle;
mod watch;

fn main() -> ExitCode {
    let opt = match Opts::try_parse() {
        Ok(opt) => opt,
        Err(e) => {
            _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    if let Err(e) = logger::init(opt.verbose) {
        eprintln!("{e}");
    }
    let res = match opt.cmd {
        Command::Get(cfg) => get::cmd(&cfg),
        Command::Init(cfg) => init::cmd(&cfg),
        Command::Panel(cfg) => panel::cmd(&cfg),
        Command::Set(cfg) => set::cmd(&cfg),
        Command::Timer(cfg) => timer::cmd(&cfg),
        Command::Toggle(cfg) => toggle::cmd(&cfg),
        Command::Watch(cfg) => watch::cmd(&cfg),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", common::format_error(opt.verbose, &e));
            ExitCode::FAILURE
        }
    }
}

#[derive(Parser)]
#[command(
    name = "pinsim",
    about = "A utility to drive GPIO pins simulated by state files.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages and debug logging.
    #[arg(short = 'v', long, global = true, display_order = 800)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Read the states of simulated pins.
    Get(get::Opts),

    /// Create any missing pin state files.
    Init(init::Opts),

    /// Interactively control the pins and timer while watching their states.
    Panel(panel::Opts),

    /// Set the states of simulated pins.
    Set(set::Opts),

    /// Periodically toggle all the simulated pins.
    Timer(timer::Opts),

    /// Toggle the states of simulated pins.
    Toggle(toggle::Opts),

    /// Report changes to the states of simulated pins.
    Watch(watch::Opts),
}
