// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pinsim::backend::Label;
use pinsim::pin::{Pin, State};
use pinsim::store::Store;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// common helper functions

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
    #[error("'{0}' is too large")]
    Overflow(String),
    #[error("'{0}' must be greater than zero")]
    Zero(String),
}

pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let t = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let t = num
                .parse::<u64>()
                .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
            let scale = match units {
                "us" => 1000,
                "ms" => 1000000,
                "s" => 1000000000,
                _ => return Err(ParseDurationError::Units(s.into())),
            };
            t.checked_mul(scale)
        }
        None => s
            .parse::<u64>()
            .map_err(|e| ParseDurationError::ParseDigits(s.into(), e))?
            .checked_mul(1000000),
    };
    t.map(Duration::from_nanos)
        .ok_or_else(|| ParseDurationError::Overflow(s.into()))
}

/// Parse a duration used as a loop period, which must be non-zero.
pub fn parse_period(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    let d = parse_duration(s)?;
    if d.is_zero() {
        return Err(ParseDurationError::Zero(s.into()));
    }
    Ok(d)
}

/// Parse a single pin=state pair
pub fn parse_pin_state(
    s: &str,
) -> std::result::Result<(Pin, State), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let (pin, state) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid pin=state: no '=' found in '{}'", s))?;
    Ok((pin.parse()?, state.parse()?))
}

// common command line parser options

#[derive(Debug, Parser)]
/// Options to locate the simulated pins.
pub struct StoreOpts {
    /// The directory containing the pin state files
    ///
    /// Each pin is simulated by a file named gpio<pin>.txt in the directory.
    /// Missing files are created with the pin off.
    #[arg(
        short = 'd',
        long,
        value_name = "dir",
        env = "PINSIM_DIR",
        default_value = "."
    )]
    pub dir: PathBuf,

    /// The simulated pins
    ///
    /// A comma separated list of pin numbers.
    /// e.g.
    ///     --pins 17,22,27
    #[arg(
        short = 'P',
        long,
        value_name = "pins",
        env = "PINSIM_PINS",
        value_delimiter = ',',
        default_value = "17,22,27",
        verbatim_doc_comment
    )]
    pub pins: Vec<Pin>,
}
impl StoreOpts {
    pub fn open(&self) -> Result<Store> {
        Store::open(&self.dir, self.pins.iter().copied())
            .with_context(|| format!("unable to open pin store in '{}'", self.dir.display()))
    }
}

/// Check the requested pins are simulated by the store.
///
/// If no pins are requested then all simulated pins are returned.
pub fn resolve_pins(store: &Store, pins: &[Pin]) -> Result<Vec<Pin>> {
    if pins.is_empty() {
        return Ok(store.pins().to_vec());
    }
    let mut resolved = Vec::new();
    for pin in pins {
        if !store.contains(*pin) {
            return Err(pinsim::Error::UnknownPin(*pin).into());
        }
        if resolved.contains(pin) {
            return Err(Error::RepeatedPin(*pin).into());
        }
        resolved.push(*pin);
    }
    Ok(resolved)
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum BackendFlags {
    #[default]
    Bash,
    C,
    #[value(alias = "asm")]
    Assembly,
}
impl From<BackendFlags> for Label {
    fn from(b: BackendFlags) -> Self {
        match b {
            BackendFlags::Bash => Label::Bash,
            BackendFlags::C => Label::C,
            BackendFlags::Assembly => Label::Assembly,
        }
    }
}

#[derive(Clone, Copy, Debug, Parser)]
pub struct BackendOpts {
    /// The backend nominally applying the change
    ///
    /// Only affects the logged provenance of the change.
    #[arg(
        short,
        long,
        value_name = "backend",
        default_value = "bash",
        value_enum,
        ignore_case = true
    )]
    pub backend: BackendFlags,
}

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,
}

pub fn format_error(verbose: bool, e: &anyhow::Error) -> String {
    if verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

pub enum TimeFmt {
    Seconds,
    Localtime,
    Utc,
}

pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

pub fn format_time(evtime: u64, timefmt: &TimeFmt) -> String {
    use chrono::{Local, TimeZone, Utc};

    let ts_sec = (evtime / 1000000000) as i64;
    let ts_nsec = (evtime % 1000000000) as u32;
    match timefmt {
        TimeFmt::Seconds => format!("{ts_sec}.{ts_nsec:09}"),
        TimeFmt::Localtime => match Local.timestamp_opt(ts_sec, ts_nsec).single() {
            Some(t) => format!("{}", t.format("%FT%T%.9f")),
            None => format!("{ts_sec}.{ts_nsec:09}"),
        },
        TimeFmt::Utc => match Utc.timestamp_opt(ts_sec, ts_nsec).single() {
            Some(t) => format!("{}", t.format("%FT%T%.9fZ")),
            None => format!("{ts_sec}.{ts_nsec:09}"),
        },
    }
}

/// Errors returned by cli functions.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    #[error("GPIO {0} is repeated")]
    RepeatedPin(Pin),
}
