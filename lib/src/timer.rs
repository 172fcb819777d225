// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::backend::{Backend, Label};
use crate::pin::{Pin, State};
use crate::{Error, Result, DEFAULT_TICK_PERIOD};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Applies a common phase to a set of pins, flipping it on each tick.
pub struct Ticker {
    backend: Arc<dyn Backend>,
    pins: Vec<Pin>,
    phase: State,
}

impl Ticker {
    /// Create a ticker for the given pins, with the phase initially off.
    pub fn new(backend: Arc<dyn Backend>, pins: &[Pin]) -> Ticker {
        Ticker {
            backend,
            pins: pins.to_vec(),
            phase: State::Off,
        }
    }

    /// The phase most recently applied to the pins.
    pub fn phase(&self) -> State {
        self.phase
    }

    /// Flip the phase and apply it to every pin, in order.
    ///
    /// Returns the new phase.
    pub fn tick(&mut self) -> State {
        self.phase = self.phase.not();
        for pin in &self.pins {
            self.backend.invoke(*pin, self.phase, Label::Timer);
        }
        self.phase
    }
}

// The handle to a running timer thread.
struct Run {
    stop: Sender<()>,
    handle: JoinHandle<u64>,
}

/// A controller for the background task that periodically toggles all pins.
///
/// When started the task ticks immediately, and then once every period
/// until stopped.  The phase restarts from off each time the timer is
/// started, so the first tick always turns the pins on.
///
/// Stopping the timer interrupts any pending wait and joins the task, so
/// no tick can occur once [`stop`] returns.
///
/// [`stop`]: Timer::stop
pub struct Timer {
    backend: Arc<dyn Backend>,
    pins: Vec<Pin>,
    period: Duration,
    tick_limit: Option<u64>,
    phase: Arc<AtomicBool>,
    run: Option<Run>,
}

impl Timer {
    /// Create a stopped timer for the given pins with the default period.
    pub fn new<B: Backend + 'static>(backend: B, pins: &[Pin]) -> Timer {
        Timer {
            backend: Arc::new(backend),
            pins: pins.to_vec(),
            period: DEFAULT_TICK_PERIOD,
            tick_limit: None,
            phase: Arc::new(AtomicBool::new(false)),
            run: None,
        }
    }

    /// Set the period between ticks.
    pub fn with_period(mut self, period: Duration) -> Timer {
        self.period = period;
        self
    }

    /// Limit each run to the given number of ticks.
    ///
    /// The task exits by itself once the limit is reached, so a limit of
    /// zero performs no ticks at all.
    pub fn with_tick_limit(mut self, limit: u64) -> Timer {
        self.tick_limit = Some(limit);
        self
    }

    /// The period between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The phase most recently applied by the task.
    pub fn phase(&self) -> State {
        self.phase.load(Ordering::SeqCst).into()
    }

    /// Return true if the task is running.
    pub fn is_running(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|run| !run.handle.is_finished())
    }

    /// Start the timer task.
    ///
    /// Fails with [`Error::TimerRunning`] if the task is already running.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::TimerRunning);
        }
        // reap any run that ended by reaching its limit
        self.stop();

        let mut ticker = Ticker::new(self.backend.clone(), &self.pins);
        let phase = self.phase.clone();
        phase.store(false, Ordering::SeqCst);
        let period = self.period;
        let limit = self.tick_limit;
        let (stop, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("pinsim-timer".into())
            .spawn(move || {
                let mut ticks = 0;
                loop {
                    if limit.is_some_and(|l| ticks >= l) {
                        return ticks;
                    }
                    let state = ticker.tick();
                    phase.store(state.into(), Ordering::SeqCst);
                    ticks += 1;
                    log::debug!("timer tick {}: pins {}", ticks, state);
                    // no need to wait out the period after the final tick
                    if limit.is_some_and(|l| ticks >= l) {
                        return ticks;
                    }
                    match rx.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        // stop requested or the controller is gone
                        _ => return ticks,
                    }
                }
            })
            .map_err(Error::Spawn)?;
        log::info!("timer started with period {:?}", self.period);
        self.run = Some(Run { stop, handle });
        Ok(())
    }

    /// Stop the timer task and wait for it to exit.
    ///
    /// Returns the number of ticks performed by the run, or zero if the
    /// timer was not running.
    pub fn stop(&mut self) -> u64 {
        let Some(run) = self.run.take() else {
            return 0;
        };
        // the task may have already exited, so ignore a closed channel
        _ = run.stop.send(());
        match run.handle.join() {
            Ok(ticks) => {
                log::info!("timer stopped after {} ticks", ticks);
                ticks
            }
            Err(_) => {
                log::error!("timer task panicked");
                0
            }
        }
    }

    /// Start the timer if stopped, or stop it if running.
    ///
    /// Returns true if the timer is now running.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_running() {
            self.stop();
            Ok(false)
        } else {
            self.start()?;
            Ok(true)
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}
