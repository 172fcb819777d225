// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, EmitOpts, StoreOpts};
use anyhow::Result;
use clap::Parser;
use pinsim::pin::{Pin, State};
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(alias("g"))]
pub struct Opts {
    /// The pins to read
    ///
    /// If no pins are specified then all simulated pins are read.
    #[arg(value_name = "pin")]
    pins: Vec<Pin>,

    #[command(flatten)]
    store_opts: StoreOpts,

    /// Display pin states as '0' (off) or '1' (on)
    #[arg(long, group = "emit")]
    numeric: bool,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    let pins = common::resolve_pins(&store, &opts.pins)?;
    let res = CmdResult {
        states: pins
            .into_iter()
            .map(|pin| PinState {
                pin,
                state: store.read(pin),
            })
            .collect(),
    };
    res.emit(opts);
    Ok(())
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResult {
    states: Vec<PinState>,
}
impl CmdResult {
    fn emit(&self, opts: &Opts) {
        #[cfg(feature = "json")]
        if opts.emit.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("{}", e),
            }
            return;
        }
        println!("{}", self.format(opts.numeric));
    }

    fn format(&self, numeric: bool) -> String {
        self.states
            .iter()
            .map(|ps| {
                if numeric {
                    let v: u8 = ps.state.into();
                    format!("{}", v)
                } else {
                    format!("{}={}", ps.pin, ps.state)
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

struct PinState {
    pin: Pin,
    state: State,
}
#[cfg(feature = "serde")]
impl serde::Serialize for PinState {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut s = serializer.serialize_map(Some(1))?;
        s.serialize_entry(&self.pin, &self.state)?;
        s.end()
    }
}
