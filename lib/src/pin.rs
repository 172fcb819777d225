// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identifier of a simulated pin.
///
/// Corresponds to the BCM number of the GPIO line being simulated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pin(pub u32);

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Pin {
    fn from(n: u32) -> Pin {
        Pin(n)
    }
}

impl FromStr for Pin {
    type Err = Error;

    /// Parse a pin from either its number, or its "GPIO" prefixed name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s
            .strip_prefix("GPIO")
            .or_else(|| s.strip_prefix("gpio"))
            .unwrap_or(s);
        num.parse::<u32>()
            .map(Pin)
            .map_err(|_| Error::InvalidPin(s.into()))
    }
}

/// The state of a simulated pin.
///
/// Persisted as the single character `'0'` (off) or `'1'` (on).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum State {
    /// The pin is off.
    #[default]
    Off,
    /// The pin is on.
    On,
}

impl State {
    /// The state opposite the current state.
    pub fn not(&self) -> State {
        match self {
            State::On => State::Off,
            State::Off => State::On,
        }
    }

    /// Decode the persisted form of a state.
    ///
    /// Only a lone `'1'`, ignoring surrounding whitespace, decodes as on.
    /// Anything else, including empty or garbled content, decodes as off.
    pub fn decode(buf: &[u8]) -> State {
        match buf.trim_ascii() {
            b"1" => State::On,
            _ => State::Off,
        }
    }

    /// The persisted form of the state.
    pub fn encode(&self) -> u8 {
        match self {
            State::Off => b'0',
            State::On => b'1',
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::On => "on",
            State::Off => "off",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "off" | "inactive" | "false" | "low" => Ok(State::Off),
            "1" | "on" | "active" | "true" | "high" => Ok(State::On),
            _ => Err(Error::InvalidState(s.into())),
        }
    }
}

impl From<State> for bool {
    fn from(s: State) -> bool {
        match s {
            State::Off => false,
            State::On => true,
        }
    }
}
impl From<State> for u8 {
    fn from(s: State) -> u8 {
        match s {
            State::Off => 0,
            State::On => 1,
        }
    }
}
impl From<bool> for State {
    fn from(b: bool) -> State {
        match b {
            false => State::Off,
            true => State::On,
        }
    }
}
impl From<u8> for State {
    fn from(i: u8) -> State {
        match i {
            0 => State::Off,
            _ => State::On,
        }
    }
}

/// A snapshot of the states of a set of pins.
///
/// Pins are kept in the order they were added.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct States(Vec<(Pin, State)>);

impl States {
    /// Construct a snapshot for a set of pins with all pins off.
    pub fn from_pins(pins: &[Pin]) -> States {
        let mut states = States::default();
        for pin in pins {
            states.set(*pin, State::Off);
        }
        states
    }

    /// Get the state of a pin.
    pub fn get(&self, pin: Pin) -> Option<State> {
        self.0.iter().find(|(p, _)| *p == pin).map(|(_, s)| *s)
    }

    /// Set the state of a pin.
    ///
    /// Pins not already present are appended.
    pub fn set(&mut self, pin: Pin, state: State) -> &mut Self {
        match self.0.iter_mut().find(|(p, _)| *p == pin) {
            Some(entry) => entry.1 = state,
            None => self.0.push((pin, state)),
        }
        self
    }

    /// The number of pins in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator over the pins and states, in order.
    pub fn iter(&self) -> impl Iterator<Item = (Pin, State)> + '_ {
        self.0.iter().copied()
    }

    /// The pins whose state in self differs from that in `prev`.
    ///
    /// Pins missing from `prev` are always included.
    pub fn changes(&self, prev: &States) -> Vec<(Pin, State)> {
        self.iter()
            .filter(|(pin, state)| prev.get(*pin) != Some(*state))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod pin {
        use super::*;

        #[test]
        fn from_str() {
            assert_eq!("17".parse::<Pin>().unwrap(), Pin(17));
            assert_eq!("GPIO22".parse::<Pin>().unwrap(), Pin(22));
            assert_eq!("gpio27".parse::<Pin>().unwrap(), Pin(27));
            assert_eq!(
                "bad".parse::<Pin>().unwrap_err().to_string(),
                "invalid pin: 'bad'"
            );
            assert!("-1".parse::<Pin>().is_err());
        }

        #[test]
        fn display() {
            assert_eq!(Pin(17).to_string(), "17");
            assert_eq!(format!("{:<3}|", Pin(4)), "4  |");
        }
    }

    mod state {
        use super::*;

        #[test]
        fn default() {
            assert_eq!(State::default(), State::Off);
        }

        #[test]
        fn not() {
            assert_eq!(State::On.not(), State::Off);
            assert_eq!(State::Off.not(), State::On);
        }

        #[test]
        fn decode() {
            assert_eq!(State::decode(b"1"), State::On);
            assert_eq!(State::decode(b"1\n"), State::On);
            assert_eq!(State::decode(b"0"), State::Off);
            assert_eq!(State::decode(b""), State::Off);
            assert_eq!(State::decode(b"11"), State::Off);
            assert_eq!(State::decode(b"on"), State::Off);
            assert_eq!(State::decode(&[0xff, 0xfe]), State::Off);
        }

        #[test]
        fn encode() {
            assert_eq!(State::On.encode(), b'1');
            assert_eq!(State::Off.encode(), b'0');
        }

        #[test]
        fn from_str() {
            for s in ["0", "off", "OFF", "inactive", "false", "low"] {
                assert_eq!(s.parse::<State>().unwrap(), State::Off, "{}", s);
            }
            for s in ["1", "on", "On", "active", "true", "high"] {
                assert_eq!(s.parse::<State>().unwrap(), State::On, "{}", s);
            }
            assert_eq!(
                "2".parse::<State>().unwrap_err().to_string(),
                "invalid pin state: '2'"
            );
        }

        #[test]
        fn from_u8() {
            assert_eq!(State::from(1), State::On);
            assert_eq!(State::from(2), State::On);
            assert_eq!(State::from(0), State::Off);
        }

        #[test]
        fn into_bool() {
            let b: bool = State::On.into();
            assert!(b);
            let b: bool = State::Off.into();
            assert!(!b);
        }
    }

    mod states {
        use super::*;

        #[test]
        fn from_pins() {
            let ss = States::from_pins(&[Pin(17), Pin(22)]);
            assert_eq!(ss.len(), 2);
            assert_eq!(ss.get(Pin(17)), Some(State::Off));
            assert_eq!(ss.get(Pin(22)), Some(State::Off));
            assert_eq!(ss.get(Pin(27)), None);
        }

        #[test]
        fn set_preserves_order() {
            let mut ss = States::from_pins(&[Pin(27), Pin(17)]);
            ss.set(Pin(17), State::On).set(Pin(22), State::On);
            let pins: Vec<Pin> = ss.iter().map(|(p, _)| p).collect();
            assert_eq!(pins, vec![Pin(27), Pin(17), Pin(22)]);
            assert_eq!(ss.get(Pin(17)), Some(State::On));
        }

        #[test]
        fn changes() {
            let prev = States::from_pins(&[Pin(17), Pin(22)]);
            let mut cur = prev.clone();
            assert!(cur.changes(&prev).is_empty());
            cur.set(Pin(22), State::On).set(Pin(27), State::Off);
            assert_eq!(
                cur.changes(&prev),
                vec![(Pin(22), State::On), (Pin(27), State::Off)]
            );
            assert_eq!(cur.changes(&States::default()).len(), 3);
        }

        #[test]
        fn is_empty() {
            assert!(States::default().is_empty());
            assert!(!States::from_pins(&[Pin(1)]).is_empty());
        }
    }
}
