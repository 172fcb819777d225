// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::StoreOpts;
use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Opts {
    #[command(flatten)]
    store_opts: StoreOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    let store = opts.store_opts.open()?;
    for pin in store.pins() {
        println!("{}\t{}", store.path(*pin).display(), store.read(*pin));
    }
    Ok(())
}
