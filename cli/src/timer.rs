// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, StoreOpts};
use anyhow::{Context, Result};
use clap::Parser;
use daemonize::Daemonize;
use pinsim::backend::FileBackend;
use pinsim::timer::Timer;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

// how often to check if a limited run has completed
const CHECK_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
pub struct Opts {
    /// The period between ticks
    ///
    /// On each tick all the pins are set to the opposite of the
    /// state applied by the previous tick, starting with on.
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        short = 'p',
        long,
        value_name = "period",
        default_value = "5s",
        value_parser = common::parse_period
    )]
    period: Duration,

    /// Exit after the specified number of ticks
    ///
    /// If not specified then the timer runs until interrupted.
    #[arg(short = 'n', long, value_name = "num", value_parser = clap::value_parser!(u64).range(1..))]
    num_ticks: Option<u64>,

    /// Start the timer then detach from the controlling terminal.
    #[arg(short = 'z', long)]
    daemonize: bool,

    #[command(flatten)]
    store_opts: StoreOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    if opts.daemonize {
        let cwd = std::env::current_dir().context("unable to determine working directory")?;
        Daemonize::new()
            .working_directory(cwd)
            .start()
            .context("unable to daemonize")?;
    }
    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        _ = tx.send(());
    })
    .context("unable to install signal handler")?;

    let pins = store.pins().to_vec();
    let mut timer = Timer::new(FileBackend::new(store), &pins).with_period(opts.period);
    if let Some(limit) = opts.num_ticks {
        timer = timer.with_tick_limit(limit);
    }
    timer.start()?;
    while timer.is_running() {
        match rx.recv_timeout(CHECK_PERIOD) {
            Err(RecvTimeoutError::Timeout) => continue,
            _ => break,
        }
    }
    timer.stop();
    Ok(())
}
