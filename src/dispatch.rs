use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use topology::Discovery;
use tracking::{Drive, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No argument: keep going in the current mode.
    Tick,
    Init,
    Start,
    Stop,
    /// Duty cycle: track for `run_s` seconds after every `pause_s` second break.
    Pace { run_s: u32, pause_s: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    UnknownVerb(String),
    #[error("Break argument not valid")]
    BreakArguments,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(argument: &str) -> Result<Self, Self::Err> {
        let mut words = argument.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Command::Tick);
        };
        match verb {
            "init" => Ok(Command::Init),
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "break" => {
                let mut seconds = || {
                    words
                        .next()
                        .and_then(|w| w.parse::<u32>().ok())
                        .ok_or(CommandError::BreakArguments)
                };
                let run_s = seconds()?;
                let pause_s = seconds()?;
                Ok(Command::Pace { run_s, pause_s })
            }
            other => Err(CommandError::UnknownVerb(other.to_string())),
        }
    }
}

/// Alternating break / tracking timer. Starts with a break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycle {
    run_s: u32,
    pause_s: u32,
    on_break: bool,
    remaining_ms: f64,
}

impl DutyCycle {
    pub fn new(run_s: u32, pause_s: u32) -> Self {
        DutyCycle {
            run_s,
            pause_s,
            on_break: false,
            remaining_ms: -1.0,
        }
    }

    fn same_cycle(&self, run_s: u32, pause_s: u32) -> bool {
        self.run_s == run_s && self.pause_s == pause_s
    }

    /// A spent phase flips on this tick without consuming `dt`.
    pub fn tick(&mut self, dt_ms: f64) {
        if self.remaining_ms < 0.0 {
            self.on_break = !self.on_break;
            let phase_s = if self.on_break { self.pause_s } else { self.run_s };
            self.remaining_ms = f64::from(phase_s) * 1000.0;
        } else {
            self.remaining_ms -= dt_ms;
        }
    }

    pub fn on_break(&self) -> bool {
        self.on_break
    }

    pub fn remaining_s(&self) -> f64 {
        self.remaining_ms / 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mode {
    #[default]
    Running,
    Stopped,
    Paced(DutyCycle),
}

/// Turns one command argument per tick into a registry call.
#[derive(Debug, Default)]
pub struct Dispatcher {
    mode: Mode,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn handle<D: Discovery>(
        &mut self,
        argument: &str,
        dt: Duration,
        registry: &mut Registry<D::Actuator, D::Collector>,
        discovery: &D,
    ) -> String {
        let command = match argument.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                log::warn!("{} ({:?}), stopping panels", e, argument);
                let mut out = format!("!!! {} !!!\n\n     Stopping panels...\n\n", e);
                out.push_str(&registry.drive(Drive::Stop));
                return out;
            }
        };

        if registry.is_empty() || command == Command::Init {
            self.mode = Mode::Running;
            let count = registry.initialize(discovery);
            return format!("{} Panels created.\n", count);
        }

        let mut out = String::new();
        match command {
            Command::Start => {
                self.mode = Mode::Running;
                out.push_str("!!! Panels started !!!\n\n");
            }
            Command::Stop => self.mode = Mode::Stopped,
            Command::Pace { run_s, pause_s } => match self.mode {
                Mode::Paced(cycle) if cycle.same_cycle(run_s, pause_s) => {}
                _ => {
                    log::info!("Duty cycle: {}s tracking, {}s break", run_s, pause_s);
                    self.mode = Mode::Paced(DutyCycle::new(run_s, pause_s));
                }
            },
            Command::Tick | Command::Init => {}
        }

        let drive = match &mut self.mode {
            Mode::Running => Drive::Advance(dt),
            Mode::Stopped => {
                out.push_str("!!! Panels stopped !!!\n\n");
                Drive::Stop
            }
            Mode::Paced(cycle) => {
                cycle.tick(dt.as_secs_f64() * 1000.0);
                if cycle.on_break() {
                    out.push_str(&format!(
                        "!!! Panels paused !!!\n   {:.1} s left\n\n",
                        cycle.remaining_s()
                    ));
                    Drive::Stop
                } else {
                    out.push_str(&format!(
                        "!!! Panels arrange !!!\n   {:.1} s left\n\n",
                        cycle.remaining_s()
                    ));
                    Drive::Advance(dt)
                }
            }
        };
        out.push_str(&registry.drive(drive));
        out
    }
}
