// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod indicator;

use self::indicator::Indicators;
use super::common::{self, BackendFlags, StoreOpts};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use pinsim::backend::{Backend, FileBackend};
use pinsim::pin::{Pin, State, States};
use pinsim::poll::Poller;
use pinsim::timer::Timer;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(alias("p"))]
pub struct Opts {
    /// The period between polls of the pin states
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        long,
        value_name = "period",
        default_value = "500ms",
        value_parser = common::parse_period
    )]
    poll_period: Duration,

    /// The period between timer ticks
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        short = 'p',
        long,
        value_name = "period",
        default_value = "5s",
        value_parser = common::parse_period
    )]
    period: Duration,

    /// A file containing the indicator displayed for pins that are on
    ///
    /// Defaults to on.txt in the state directory.
    #[arg(long, value_name = "file")]
    on_icon: Option<PathBuf>,

    /// A file containing the indicator displayed for pins that are off
    ///
    /// Defaults to off.txt in the state directory.
    #[arg(long, value_name = "file")]
    off_icon: Option<PathBuf>,

    #[command(flatten)]
    store_opts: StoreOpts,
}

pub fn cmd(opts: &Opts) -> Result<()> {
    Panel::new(opts)?.run()
}

struct Panel {
    backend: FileBackend,
    timer: Timer,
    poller: Poller,
    indicators: Indicators,
}

// The outcome of handling the input received so far.
#[derive(Debug, Eq, PartialEq)]
enum Input {
    // no complete line yet
    Partial,
    Handled,
    Exit,
}

impl Panel {
    fn new(opts: &Opts) -> Result<Panel> {
        let indicators = Indicators::load(
            &opts.store_opts.dir,
            opts.on_icon.as_deref(),
            opts.off_icon.as_deref(),
        )?;
        let store = opts.store_opts.open()?;
        let backend = FileBackend::new(store.clone());
        let timer = Timer::new(backend.clone(), store.pins()).with_period(opts.period);
        let poller = Poller::new(store).with_period(opts.poll_period);
        Ok(Panel {
            backend,
            timer,
            poller,
            indicators,
        })
    }

    fn run(&mut self) -> Result<()> {
        let mut input = LineBuffer::default();
        let mut buf = [0_u8; 1024];
        println!("type \"help\" for the list of commands");
        loop {
            if let Some(changes) = self.poller.poll_if_due(Instant::now()) {
                if !changes.is_empty() {
                    self.draw();
                }
            }
            if !wait_stdin(self.poller.timeout(Instant::now())).context("poll failed")? {
                continue;
            }
            let n = read_stdin(&mut buf).context("failed to read input")?;
            if n == 0 {
                return Ok(());
            }
            input.push(&buf[..n]);
            match self.handle_lines(&mut input) {
                Input::Partial => (),
                Input::Handled => prompt(),
                Input::Exit => return Ok(()),
            }
        }
    }

    fn handle_lines(&mut self, input: &mut LineBuffer) -> Input {
        let mut handled = Input::Partial;
        while let Some(line) = input.next_line() {
            handled = Input::Handled;
            match parse_command(&line) {
                Ok(None) => (),
                Ok(Some(Command::Exit)) => return Input::Exit,
                Ok(Some(cmd)) => {
                    if let Err(err) = self.exec(cmd) {
                        println!("{}", err);
                    }
                }
                Err(err) => println!("{}", err),
            }
        }
        handled
    }

    fn exec(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Set(pin, state, backend) => {
                if !self.backend.store().contains(pin) {
                    bail!(pinsim::Error::UnknownPin(pin));
                }
                // the indicator follows at the next poll
                self.backend.invoke(pin, state, backend.into());
            }
            Command::Timer => {
                if self.timer.toggle()? {
                    println!("timer started");
                } else {
                    println!("timer stopped");
                }
            }
            Command::Get => self.draw(),
            Command::Help => print_help(),
            Command::Exit => (),
        }
        Ok(())
    }

    fn draw(&self) {
        if let Some(states) = self.poller.current() {
            print!(
                "\n{}",
                render(states, &self.indicators, self.timer.is_running())
            );
            prompt();
        }
    }
}

fn render(states: &States, indicators: &Indicators, timer_running: bool) -> String {
    let mut s = String::from("GPIO SIMULATOR\n");
    for (pin, state) in states.iter() {
        let indicator = indicators.get(state).replace('\n', "\n           ");
        s += &format!("  GPIO {:<3}  {}\n", pin, indicator);
    }
    s += &format!(
        "  timer: {}\n",
        if timer_running { "running" } else { "stopped" }
    );
    s
}

fn prompt() {
    let mut stdout = std::io::stdout();
    _ = stdout.write(b"pinsim> ");
    _ = stdout.flush();
}

fn print_help() {
    let cmds = [
        (
            "on <pin> [backend]",
            "Turn the pin on via the backend (bash, c or assembly)",
        ),
        (
            "off <pin> [backend]",
            "Turn the pin off via the backend (bash, c or assembly)",
        ),
        ("timer", "Start the timer if stopped, else stop it"),
        ("get", "Redisplay the pin states"),
        ("help", "Print this help"),
        ("exit", "Exit the program"),
    ];
    println!("COMMANDS:");
    for (cmd, help) in cmds {
        println!("    {:<20} {}", cmd, help);
    }
}

#[derive(Debug, Eq, PartialEq)]
enum Command {
    Set(Pin, State, BackendFlags),
    Timer,
    Get,
    Help,
    Exit,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_ascii_whitespace();
    let cmd = match words.next() {
        None => return Ok(None),
        Some(word @ ("on" | "off")) => {
            let state = word.parse::<State>()?;
            let pin = words
                .next()
                .ok_or_else(|| anyhow!("invalid command: require pin"))?
                .parse::<Pin>()?;
            let backend = match words.next() {
                Some(b) => BackendFlags::from_str(b, true)
                    .map_err(|_| anyhow!("unknown backend: '{}'", b))?,
                None => BackendFlags::default(),
            };
            Command::Set(pin, state, backend)
        }
        Some("timer") => Command::Timer,
        Some("get") => Command::Get,
        Some("help" | "?") => Command::Help,
        Some("exit" | "quit") => Command::Exit,
        Some(x) => bail!("unknown command: '{}'", x),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected argument: '{}'", extra);
    }
    Ok(Some(cmd))
}

// Input accumulated from stdin, split into lines.
#[derive(Default)]
struct LineBuffer(Vec<u8>);

impl LineBuffer {
    fn push(&mut self, buf: &[u8]) {
        self.0.extend_from_slice(buf);
    }

    fn next_line(&mut self) -> Option<String> {
        let pos = self.0.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.0.drain(..=pos).collect();
        Some(String::from_utf8_lossy(&line).trim_end().to_string())
    }
}

// Wait for stdin to become readable, or for the timeout to expire.
//
// Level triggered, so input left over from a previous read is reported again.
fn wait_stdin(timeout: Duration) -> std::io::Result<bool> {
    let mut fds = [libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    }];
    // round up so a sub-millisecond wait doesn't spin
    let ms = timeout.as_micros().div_ceil(1000).min(libc::c_int::MAX as u128) as libc::c_int;
    // SAFETY: fds is a valid array of one pollfd
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), 1, ms) };
    if rc < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0)
}

fn read_stdin(buf: &mut [u8]) -> std::io::Result<usize> {
    // SAFETY: buf is valid for writes of buf.len() bytes
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(n as usize)
}
