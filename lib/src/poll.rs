// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pin::{Pin, State, States};
use crate::store::Store;
use crate::DEFAULT_POLL_PERIOD;
use std::time::{Duration, Instant};

/// Tracks the persisted pin states by reading them at a fixed interval.
///
/// The poller does not own a thread.  It is driven by the caller's event
/// loop, which blocks for at most [`timeout`] and then calls
/// [`poll_if_due`], so polling interleaves with the handling of user input.
///
/// The poller reports whatever is on disk, regardless of who wrote it.
///
/// [`timeout`]: Poller::timeout
/// [`poll_if_due`]: Poller::poll_if_due
#[derive(Debug)]
pub struct Poller {
    store: Store,
    period: Duration,
    // None until the first poll
    current: Option<States>,
    deadline: Option<Instant>,
}

impl Poller {
    /// Create a poller for the store with the default period.
    ///
    /// The first poll is due immediately.
    pub fn new(store: Store) -> Poller {
        Poller {
            store,
            period: DEFAULT_POLL_PERIOD,
            current: None,
            deadline: None,
        }
    }

    /// Set the period between polls.
    pub fn with_period(mut self, period: Duration) -> Poller {
        self.period = period;
        self
    }

    /// The period between polls.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The store being polled.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The states read by the most recent poll, if any.
    pub fn current(&self) -> Option<&States> {
        self.current.as_ref()
    }

    /// How long the caller may wait before the next poll is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Poll the states if the next poll is due.
    ///
    /// Returns the pins whose states have changed since the previous poll,
    /// or all pins for the first poll.  Returns None if the poll is not yet
    /// due, and an empty list if nothing changed.
    pub fn poll_if_due(&mut self, now: Instant) -> Option<Vec<(Pin, State)>> {
        if self.deadline.is_some_and(|d| now < d) {
            return None;
        }
        let prev = self.current.take().unwrap_or_default();
        let changes = self.read(now).changes(&prev);
        Some(changes)
    }

    /// Poll the states immediately, and reschedule the next poll.
    pub fn poll(&mut self) -> &States {
        self.read(Instant::now())
    }

    fn read(&mut self, now: Instant) -> &States {
        let states = self.store.snapshot();
        log::debug!("polled {:?}", states);
        self.deadline = Some(now + self.period);
        self.current.insert(states)
    }
}
