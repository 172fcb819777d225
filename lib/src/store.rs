// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pin::{Pin, State, States};
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The persisted states of a fixed set of simulated pins.
///
/// Each pin is backed by a file named `gpio<pin>.txt` in the store directory,
/// containing the single character `'0'` or `'1'`.
///
/// The files are the only state shared between writers and readers, so a
/// `Store` is cheap to clone and clones refer to the same files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Store {
    /// The directory containing the state files.
    dir: PathBuf,

    /// The simulated pins, in declared order.
    pins: Vec<Pin>,
}

impl Store {
    /// Open the store in the given directory.
    ///
    /// The directory is created if necessary, as is the state file of any
    /// pin that does not already have one, in which case the pin is off.
    /// Existing state files are left untouched.
    pub fn open<P: AsRef<Path>, I: IntoIterator<Item = Pin>>(dir: P, pins: I) -> Result<Store> {
        let mut store = Store {
            dir: dir.as_ref().to_path_buf(),
            pins: Vec::new(),
        };
        for pin in pins {
            if !store.pins.contains(&pin) {
                store.pins.push(pin);
            }
        }
        fs::create_dir_all(&store.dir).map_err(|e| Error::Io(store.dir.clone(), e))?;
        for pin in &store.pins {
            let path = store.path(*pin);
            if !path.exists() {
                write_attr(&path, State::Off)?;
                log::debug!("created {}", path.display());
            }
        }
        Ok(store)
    }

    /// The directory containing the state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The simulated pins, in declared order.
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// Return true if the pin is one of the simulated pins.
    pub fn contains(&self, pin: Pin) -> bool {
        self.pins.contains(&pin)
    }

    /// The path to the state file for a pin.
    pub fn path(&self, pin: Pin) -> PathBuf {
        self.dir.join(format!("gpio{}.txt", pin))
    }

    /// Persist the state of a pin.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn write(&self, pin: Pin, state: State) {
        if let Err(e) = self.try_write(pin, state) {
            log::error!("unable to set GPIO {} {}: {}", pin, state, e);
        }
    }

    /// Persist the state of a pin, returning any failure.
    pub fn try_write(&self, pin: Pin, state: State) -> Result<()> {
        if !self.contains(pin) {
            return Err(Error::UnknownPin(pin));
        }
        write_attr(&self.path(pin), state)
    }

    /// Read the persisted state of a pin.
    ///
    /// Pins that are unknown, or whose files are missing or unreadable,
    /// are reported as off.
    pub fn read(&self, pin: Pin) -> State {
        if !self.contains(pin) {
            return State::Off;
        }
        let path = self.path(pin);
        match fs::read(&path) {
            Ok(buf) => State::decode(&buf),
            Err(e) => {
                log::debug!("unable to read {}: {}", path.display(), e);
                State::Off
            }
        }
    }

    /// Read the persisted states of all the pins.
    pub fn snapshot(&self) -> States {
        let mut states = States::default();
        for pin in &self.pins {
            states.set(*pin, self.read(*pin));
        }
        states
    }
}

// Overwrite a state file with the persisted form of the state.
fn write_attr(path: &Path, state: State) -> Result<()> {
    fs::write(path, [state.encode()]).map_err(|e| Error::Io(path.to_path_buf(), e))
}
