// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(dead_code)]

use pinsim::backend::{Backend, Label};
use pinsim::pin::{Pin, State};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

// max time to wait for the timer thread to make progress
const PROGRESS_TIMEOUT: Duration = Duration::from_secs(5);

/// A uniquely named state directory that is removed when dropped.
pub struct StateDir {
    path: PathBuf,
}

impl StateDir {
    pub fn new(name: &str) -> StateDir {
        global_counter!(DIR_COUNT, u32, 0);

        let mut path = std::env::temp_dir();
        path.push(format!(
            "pinsim-{}-p{}-{}",
            name,
            std::process::id(),
            DIR_COUNT.inc_cloning()
        ));
        StateDir { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, pin: Pin) -> PathBuf {
        self.path.join(format!("gpio{}.txt", pin))
    }
}

impl Drop for StateDir {
    fn drop(&mut self) {
        _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A backend that records every invocation.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<(Pin, State, Label)>>);

impl Recorder {
    pub fn calls(&self) -> Vec<(Pin, State, Label)> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Backend for Recorder {
    fn invoke(&self, pin: Pin, state: State, label: Label) {
        self.0.lock().unwrap().push((pin, state, label));
    }
}

/// Wait for a condition to become true, panicking if it takes too long.
pub fn wait_until<F: Fn() -> bool>(cond: F) {
    let start = Instant::now();
    while !cond() {
        assert!(
            start.elapsed() < PROGRESS_TIMEOUT,
            "timed out waiting for condition"
        );
        std::thread::sleep(Duration::from_millis(1));
    }
}
