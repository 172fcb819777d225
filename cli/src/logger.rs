// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writes log records to stderr, timestamped in local time.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        _ = writeln!(
            stderr,
            "{} {:<5} {}",
            Local::now().format("%T%.3f"),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        _ = std::io::stderr().flush();
    }
}

/// Install the logger, reporting debug records if verbose.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    Ok(())
}
