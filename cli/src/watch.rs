// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, StoreOpts, TimeFmt};
use anyhow::Result;
use clap::Parser;
use pinsim::pin::{Pin, State};
use pinsim::poll::Poller;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(alias("w"))]
pub struct Opts {
    /// The period between polls of the pin states
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        short = 'p',
        long,
        value_name = "period",
        default_value = "500ms",
        value_parser = common::parse_period
    )]
    poll_period: Duration,

    /// Exit after the specified number of changes
    ///
    /// The initial states are not counted as changes.
    #[arg(short, long, value_name = "num")]
    num_changes: Option<u32>,

    /// Exit if no changes are seen for the specified period.
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(long, value_name = "period", value_parser = common::parse_duration)]
    idle_timeout: Option<Duration>,

    /// Format timestamps as local time
    #[arg(long, group = "timefmt")]
    localtime: bool,

    /// Format timestamps as UTC
    #[arg(long, group = "timefmt")]
    utc: bool,

    #[command(flatten)]
    store_opts: StoreOpts,
}

impl Opts {
    fn timefmt(&self) -> TimeFmt {
        if self.localtime {
            TimeFmt::Localtime
        } else if self.utc {
            TimeFmt::Utc
        } else {
            TimeFmt::Seconds
        }
    }
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    let mut poller = Poller::new(store).with_period(opts.poll_period);
    let timefmt = opts.timefmt();
    let mut count = 0;
    let mut first = true;
    let mut last_change = Instant::now();
    loop {
        let now = Instant::now();
        if let Some(changes) = poller.poll_if_due(now) {
            if !changes.is_empty() {
                last_change = now;
            }
            for (pin, state) in changes {
                print_change(pin, state, &timefmt);
                if first {
                    continue;
                }
                count += 1;
                if opts.num_changes.is_some_and(|limit| count >= limit) {
                    return Ok(());
                }
            }
            first = false;
            _ = std::io::stdout().flush();
        }
        if opts
            .idle_timeout
            .is_some_and(|idle| now.duration_since(last_change) >= idle)
        {
            return Ok(());
        }
        thread::sleep(poller.timeout(Instant::now()));
    }
}

fn print_change(pin: Pin, state: State, timefmt: &TimeFmt) {
    println!(
        "{}\t{}\t{}",
        common::format_time(common::now_ns(), timefmt),
        pin,
        state
    );
}
