// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{bail, Context, Result};
use pinsim::pin::State;
use std::fs;
use std::path::{Path, PathBuf};

/// The asset displayed for pins that are on, if not otherwise specified.
pub(super) const ON_ASSET: &str = "on.txt";

/// The asset displayed for pins that are off, if not otherwise specified.
pub(super) const OFF_ASSET: &str = "off.txt";

/// The glyphs displayed for pins that are on and off.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Indicators {
    on: String,
    off: String,
}

impl Indicators {
    pub(super) fn new<S: Into<String>>(on: S, off: S) -> Indicators {
        Indicators {
            on: on.into(),
            off: off.into(),
        }
    }

    /// Load both indicators from their asset files.
    ///
    /// Assets not explicitly provided are taken from [`ON_ASSET`] and
    /// [`OFF_ASSET`] in `dir`.  Both assets must exist and be non-empty.
    pub(super) fn load(dir: &Path, on: Option<&Path>, off: Option<&Path>) -> Result<Indicators> {
        let on = asset_path(dir, on, ON_ASSET);
        let off = asset_path(dir, off, OFF_ASSET);
        Ok(Indicators::new(load_asset(&on)?, load_asset(&off)?))
    }

    pub(super) fn get(&self, state: State) -> &str {
        match state {
            State::On => &self.on,
            State::Off => &self.off,
        }
    }
}

fn asset_path(dir: &Path, path: Option<&Path>, default: &str) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => dir.join(default),
    }
}

fn load_asset(path: &Path) -> Result<String> {
    let asset = fs::read_to_string(path)
        .with_context(|| format!("unable to load indicator '{}'", path.display()))?;
    let asset = asset.trim_end();
    if asset.is_empty() {
        bail!("indicator '{}' is empty", path.display());
    }
    Ok(asset.to_string())
}
