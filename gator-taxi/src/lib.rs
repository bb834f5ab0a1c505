//! Command-file driver for the ride registry.
//!
//! Reads one [`Command`] per line, applies it to a
//! [`RideRegistry`](gator_dispatch::RideRegistry), and writes one line for
//! every command that produces output. `Insert`, `CancelRide`, and
//! `UpdateTrip` are silent unless the insert is a duplicate.

#![warn(missing_docs)]

pub mod command;
pub mod output;

use std::io::{BufRead, Write};

use anyhow::Context;
use gator_dispatch::{RegistryError, RideRegistry};
use tracing::{debug, warn};

pub use command::{Command, ParseError};

/// Line counts from one [`Driver::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Commands applied to the registry.
    pub executed: usize,
    /// Non-blank lines that failed to parse.
    pub skipped: usize,
    /// Output lines written.
    pub written: usize,
}

/// Applies commands to a registry and renders their results.
#[derive(Debug)]
pub struct Driver {
    registry: RideRegistry,
}

impl Driver {
    /// Wraps a registry.
    pub fn new(registry: RideRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RideRegistry {
        &self.registry
    }

    /// Applies one command, returning the output line it produces, if any.
    pub fn execute(&mut self, command: Command) -> Option<String> {
        let registry = &mut self.registry;
        match command {
            Command::Insert {
                ride_id,
                cost,
                duration,
            } => match registry.insert(ride_id, cost, duration) {
                Ok(()) => None,
                Err(RegistryError::DuplicateKey(_)) => Some(output::DUPLICATE_RIDE.to_owned()),
                Err(err) => {
                    warn!(ride_id, %err, "insert rejected");
                    None
                }
            },
            Command::GetNextRide => Some(match registry.dispatch_next() {
                Ok(ride) => output::ride(&ride),
                Err(_) => output::NO_ACTIVE_RIDES.to_owned(),
            }),
            Command::Print { ride_id } => Some(match registry.get(ride_id) {
                Ok(ride) => output::ride(&ride),
                Err(_) => output::NO_RIDE.to_owned(),
            }),
            Command::PrintRange { low, high } => Some(output::rides(&registry.range(low, high))),
            Command::CancelRide { ride_id } => {
                if let Err(err) = registry.cancel(ride_id) {
                    debug!(%err, "cancel ignored");
                }
                None
            }
            Command::UpdateTrip {
                ride_id,
                new_duration,
            } => {
                if let Err(err) = registry.update_trip(ride_id, new_duration) {
                    debug!(%err, "update ignored");
                }
                None
            }
        }
    }

    /// Executes every line of `input`, writing results to `output`.
    ///
    /// Blank lines are ignored. Lines that fail to parse are logged and
    /// skipped; processing continues with the next line.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> anyhow::Result<Summary> {
        let mut summary = Summary::default();

        for (number, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read line {}", number + 1))?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(err) => {
                    warn!(
                        line = number + 1,
                        text = %line.trim(),
                        %err,
                        "skipping malformed command"
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

            summary.executed += 1;
            if let Some(text) = self.execute(command) {
                writeln!(output, "{text}").context("failed to write output")?;
                summary.written += 1;
            }
        }

        output.flush().context("failed to flush output")?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gator_dispatch::RegistryBuilder;
    use std::io::Cursor;

    fn run(input: &str) -> (String, Summary) {
        let registry = RegistryBuilder::default().build().unwrap();
        let mut driver = Driver::new(registry);
        let mut out = Vec::new();
        let summary = driver.run(Cursor::new(input), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn silent_commands_write_nothing() {
        let input = "Insert(1,2,3)\nUpdateTrip(1,4)\nCancelRide(1)\nCancelRide(1)\n";
        let (out, summary) = run(input);
        assert_eq!(out, "");
        assert_eq!(summary.executed, 4);
        assert_eq!(summary.written, 0);
    }

    #[test]
    fn duplicate_continues() {
        let (out, _) = run("Insert(1,2,3)\nInsert(1,9,9)\nPrint(1)\n");
        assert_eq!(out, "Duplicate Ride Number\n(1,2,3)\n");
    }

    #[test]
    fn empty_results() {
        let (out, _) = run("GetNextRide()\nPrint(4)\nPrint(1,10)\n");
        assert_eq!(out, "No active ride requests\n(0,0,0)\n(0,0,0)\n");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (out, summary) = run("Insert(1,2,3)\n\nBogus(1)\nPrint(1\nPrint(1)\n");
        assert_eq!(out, "(1,2,3)\n");
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.executed, 2);
    }

    #[test]
    fn capacity_rejection_is_silent() {
        let registry = RegistryBuilder::default().capacity(1).build().unwrap();
        let mut driver = Driver::new(registry);
        assert_eq!(
            driver.execute(Command::Insert {
                ride_id: 1,
                cost: 1,
                duration: 1
            }),
            None
        );
        assert_eq!(
            driver.execute(Command::Insert {
                ride_id: 2,
                cost: 1,
                duration: 1
            }),
            None
        );
        assert_eq!(driver.registry().len(), 1);
    }
}
