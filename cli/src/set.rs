// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, BackendOpts, StoreOpts};
use anyhow::Result;
use clap::Parser;
use pinsim::backend::{Backend, FileBackend};
use pinsim::pin::{Pin, State};

#[derive(Debug, Parser)]
#[command(alias("s"))]
pub struct Opts {
    /// The pin states
    ///
    /// The states are specified in pin=state format.
    ///
    /// States may be off/inactive/false/low/0 or on/active/true/high/1.
    /// e.g.
    ///     17=on 22=0
    #[arg(
        value_name = "pin=state",
        required = true,
        value_parser = common::parse_pin_state,
        verbatim_doc_comment
    )]
    pin_states: Vec<(Pin, State)>,

    #[command(flatten)]
    backend_opts: BackendOpts,

    #[command(flatten)]
    store_opts: StoreOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    let pins: Vec<Pin> = opts.pin_states.iter().map(|(pin, _)| *pin).collect();
    // validate all before changing any
    common::resolve_pins(&store, &pins)?;
    let backend = FileBackend::new(store);
    let label = opts.backend_opts.backend.into();
    for (pin, state) in &opts.pin_states {
        backend.invoke(*pin, *state, label);
    }
    Ok(())
}
