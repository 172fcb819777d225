// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, BackendOpts, StoreOpts};
use anyhow::Result;
use clap::Parser;
use pinsim::backend::{Backend, FileBackend};
use pinsim::pin::Pin;

#[derive(Debug, Parser)]
#[command(alias("t"))]
pub struct Opts {
    /// The pins to toggle
    ///
    /// If no pins are specified then all simulated pins are toggled.
    #[arg(value_name = "pin")]
    pins: Vec<Pin>,

    #[command(flatten)]
    backend_opts: BackendOpts,

    #[command(flatten)]
    store_opts: StoreOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    let pins = common::resolve_pins(&store, &opts.pins)?;
    let backend = FileBackend::new(store);
    let label = opts.backend_opts.backend.into();
    for pin in pins {
        let state = backend.store().read(pin).not();
        backend.invoke(pin, state, label);
    }
    Ok(())
}
