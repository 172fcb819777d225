// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Blink the default pins with the timer while watching them with a poller.

use anyhow::Context;
use pinsim::poll::Poller;
use pinsim::store::Store;
use pinsim::timer::Timer;
use pinsim::{backend::FileBackend, DEFAULT_PINS};
use std::result::Result;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("pinsim-blink");
    let store = Store::open(&dir, DEFAULT_PINS).context("Failed to open store")?;

    let mut timer = Timer::new(FileBackend::new(store.clone()), store.pins())
        .with_period(Duration::from_secs(1));
    timer.start().context("Failed to start timer")?;

    let mut poller = Poller::new(store).with_period(Duration::from_millis(100));
    let end = Instant::now() + Duration::from_secs(5);
    while Instant::now() < end {
        if let Some(changes) = poller.poll_if_due(Instant::now()) {
            for (pin, state) in changes {
                println!("GPIO{}={}", pin, state);
            }
        }
        thread::sleep(poller.timeout(Instant::now()));
    }
    println!("{} ticks", timer.stop());
    Ok(())
}
