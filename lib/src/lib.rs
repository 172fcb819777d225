// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for simulating GPIO lines using plain files.
//!
//! Each simulated pin is backed by a file containing a single `'0'` or `'1'`.
//! The pins and their persisted states are managed by the [`store`] module.
//!
//! Changes are applied through a [`backend`], which stands in for whatever
//! mechanism would drive real hardware.
//!
//! The [`timer`] periodically toggles all pins from a background thread,
//! while the [`poll`] module tracks the persisted states for display.
//!
//! ```no_run
//! # use pinsim::Result;
//! use pinsim::backend::{Backend, FileBackend, Label};
//! use pinsim::pin::{Pin, State};
//! use pinsim::store::Store;
//!
//! # fn main() -> Result<()> {
//! let store = Store::open("/tmp/pins", pinsim::DEFAULT_PINS)?;
//! let backend = FileBackend::new(store.clone());
//! backend.invoke(Pin(17), State::On, Label::Bash);
//! assert_eq!(store.read(Pin(17)), State::On);
//! # Ok(())
//! # }
//! ```
//!
//! [`store`]: module@store
//! [`backend`]: module@backend
//! [`timer`]: module@timer
//! [`poll`]: module@poll

use std::path::PathBuf;
use std::time::Duration;

/// Types identifying pins and their states.
pub mod pin;

/// The file backed persistence of pin states.
pub mod store;

/// The extension point through which pin states are changed.
pub mod backend;

/// The background timer that periodically toggles all pins.
pub mod timer;

/// Cooperative polling of the persisted pin states.
pub mod poll;

/// The pins simulated when no others are configured.
pub const DEFAULT_PINS: [pin::Pin; 3] = [pin::Pin(17), pin::Pin(22), pin::Pin(27)];

/// The default period between timer ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(5);

/// The default period between polls of the pin states.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(500);

/// Errors returned by [`pinsim`] functions.
///
/// [`pinsim`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error accessing a state file or directory.
    #[error("\"{0}\" {1}")]
    Io(PathBuf, #[source] std::io::Error),

    /// The pin is not one of the configured pins.
    #[error("GPIO {0} is not a simulated pin")]
    UnknownPin(pin::Pin),

    /// A pin identifier could not be parsed.
    #[error("invalid pin: '{0}'")]
    InvalidPin(String),

    /// A pin state could not be parsed.
    #[error("invalid pin state: '{0}'")]
    InvalidState(String),

    /// The timer was started while already running.
    #[error("timer is already running")]
    TimerRunning,

    /// The timer thread could not be spawned.
    #[error("unable to spawn timer thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// The result for [`pinsim`] functions.
///
/// [`pinsim`]: crate
pub type Result<T> = std::result::Result<T, Error>;
