// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pin::{Pin, State};
use crate::store::Store;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The mechanism nominally responsible for a change of pin state.
///
/// The label only affects the logged provenance of a change, never the
/// resulting state.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Label {
    /// A shell script.
    Bash,
    /// A compiled C program.
    C,
    /// An assembly program.
    Assembly,
    /// The periodic timer.
    Timer,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Label::Bash => "BASH",
            Label::C => "C",
            Label::Assembly => "ASSEMBLY",
            Label::Timer => "TIMER",
        };
        write!(f, "{}", s)
    }
}

/// A capability to change the state of a pin.
///
/// This is where a call to real hardware, or to an external program driving
/// it, would be made.  Implementations report nothing back to the caller.
pub trait Backend: Send + Sync {
    /// Set the state of a pin on behalf of the labelled mechanism.
    fn invoke(&self, pin: Pin, state: State, label: Label);
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn invoke(&self, pin: Pin, state: State, label: Label) {
        (**self).invoke(pin, state, label)
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    fn invoke(&self, pin: Pin, state: State, label: Label) {
        (**self).invoke(pin, state, label)
    }
}

/// A backend that applies changes directly to a [`Store`].
#[derive(Clone, Debug)]
pub struct FileBackend {
    store: Store,
}

impl FileBackend {
    /// Create a backend writing to the given store.
    pub fn new(store: Store) -> FileBackend {
        FileBackend { store }
    }

    /// The store the backend writes to.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Backend for FileBackend {
    fn invoke(&self, pin: Pin, state: State, label: Label) {
        log::info!("[{}] GPIO {} set to {}", label, pin, state);
        self.store.write(pin, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_display() {
        assert_eq!(Label::Bash.to_string(), "BASH");
        assert_eq!(Label::C.to_string(), "C");
        assert_eq!(Label::Assembly.to_string(), "ASSEMBLY");
        assert_eq!(Label::Timer.to_string(), "TIMER");
    }
}
