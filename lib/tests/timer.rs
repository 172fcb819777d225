// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[macro_use]
extern crate global_counter;

mod common;

use common::{wait_until, Recorder, StateDir};
use pinsim::backend::{Backend, FileBackend, Label};
use pinsim::pin::{Pin, State};
use pinsim::store::Store;
use pinsim::timer::{Ticker, Timer};
use pinsim::DEFAULT_PINS;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn two_ticks_restore_states() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &DEFAULT_PINS)
        .with_period(Duration::from_millis(5))
        .with_tick_limit(2);
    t.start().unwrap();
    wait_until(|| !t.is_running());
    assert_eq!(t.stop(), 2);
    assert_eq!(t.phase(), State::Off);

    let calls = rec.calls();
    assert_eq!(calls.len(), 2 * DEFAULT_PINS.len());
    for pin in DEFAULT_PINS {
        let states: Vec<State> = calls
            .iter()
            .filter(|(p, _, _)| *p == pin)
            .map(|(_, s, _)| *s)
            .collect();
        assert_eq!(states, vec![State::On, State::Off]);
    }
    assert!(calls.iter().all(|(_, _, l)| *l == Label::Timer));
}

#[test]
fn ticks_apply_pins_in_order() {
    let rec = Arc::new(Recorder::default());
    let pins = [Pin(27), Pin(17), Pin(22)];
    let mut t = Timer::new(rec.clone(), &pins).with_tick_limit(1);
    t.start().unwrap();
    wait_until(|| !t.is_running());
    t.stop();
    let order: Vec<Pin> = rec.calls().iter().map(|(p, _, _)| *p).collect();
    assert_eq!(order, pins.to_vec());
}

#[test]
fn first_tick_is_immediate() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &DEFAULT_PINS).with_period(Duration::from_secs(3600));
    t.start().unwrap();
    wait_until(|| t.phase() == State::On);
    assert_eq!(rec.len(), DEFAULT_PINS.len());
    assert!(t.is_running());
    // stop interrupts the pending hour long wait
    assert_eq!(t.stop(), 1);
    assert!(!t.is_running());
}

#[test]
fn no_ticks_after_stop() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &DEFAULT_PINS).with_period(Duration::from_millis(2));
    t.start().unwrap();
    wait_until(|| rec.len() >= 3 * DEFAULT_PINS.len());
    let ticks = t.stop();
    let count = rec.len();
    assert_eq!(count as u64, ticks * DEFAULT_PINS.len() as u64);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(rec.len(), count);
}

#[test]
fn start_while_running() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &DEFAULT_PINS).with_period(Duration::from_secs(3600));
    t.start().unwrap();
    assert!(matches!(t.start(), Err(pinsim::Error::TimerRunning)));
    wait_until(|| rec.len() == DEFAULT_PINS.len());
    assert_eq!(t.stop(), 1);
    // the rejected start did not spawn a second task
    assert_eq!(rec.len(), DEFAULT_PINS.len());
}

#[test]
fn restart_resets_phase() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &[Pin(17)]).with_tick_limit(1);
    t.start().unwrap();
    wait_until(|| !t.is_running());
    // a finished run is reaped by the next start
    t.start().unwrap();
    wait_until(|| !t.is_running());
    t.stop();
    assert_eq!(
        rec.calls(),
        vec![
            (Pin(17), State::On, Label::Timer),
            (Pin(17), State::On, Label::Timer)
        ]
    );
}

#[test]
fn toggle() {
    let rec = Arc::new(Recorder::default());
    let mut t = Timer::new(rec.clone(), &DEFAULT_PINS).with_period(Duration::from_secs(3600));
    assert!(t.toggle().unwrap());
    assert!(t.is_running());
    assert!(!t.toggle().unwrap());
    assert!(!t.is_running());
}

#[test]
fn drop_stops_task() {
    let rec = Arc::new(Recorder::default());
    {
        let mut t =
            Timer::new(rec.clone(), &DEFAULT_PINS).with_period(Duration::from_millis(2));
        t.start().unwrap();
        wait_until(|| rec.len() >= DEFAULT_PINS.len());
    }
    let count = rec.len();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(rec.len(), count);
}

#[test]
fn user_press_then_timer() {
    let sd = StateDir::new("scenario");
    let store = Store::open(sd.path(), DEFAULT_PINS).unwrap();
    let backend = Arc::new(FileBackend::new(store.clone()));

    backend.invoke(Pin(17), State::On, Label::Bash);
    assert_eq!(store.read(Pin(17)), State::On);
    assert_eq!(store.read(Pin(22)), State::Off);
    assert_eq!(store.read(Pin(27)), State::Off);

    let mut ticker = Ticker::new(backend, store.pins());
    assert_eq!(ticker.tick(), State::On);
    for pin in DEFAULT_PINS {
        assert_eq!(store.read(pin), State::On);
    }
    assert_eq!(ticker.tick(), State::Off);
    for pin in DEFAULT_PINS {
        assert_eq!(store.read(pin), State::Off);
    }
}
