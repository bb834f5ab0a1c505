//! Command-file line parser.
//!
//! One command per line, in call syntax:
//!
//! ```text
//! Insert(rideNumber, rideCost, tripDuration)
//! GetNextRide()
//! Print(rideNumber)
//! Print(rideNumber1, rideNumber2)
//! CancelRide(rideNumber)
//! UpdateTrip(rideNumber, newTripDuration)
//! ```
//!
//! Whitespace around the name and arguments is ignored. `GetNextRide` may
//! omit its parentheses.

use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// A parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Register a new ride.
    Insert {
        /// Ride number.
        ride_id: u32,
        /// Estimated cost.
        cost: u64,
        /// Estimated duration.
        duration: u64,
    },
    /// Dispatch the cheapest pending ride.
    GetNextRide,
    /// Look up one ride.
    Print {
        /// Ride number.
        ride_id: u32,
    },
    /// List rides with ids in `[low, high]`.
    PrintRange {
        /// Lower bound, inclusive.
        low: u32,
        /// Upper bound, inclusive.
        high: u32,
    },
    /// Cancel a pending ride.
    CancelRide {
        /// Ride number.
        ride_id: u32,
    },
    /// Change a pending ride's duration.
    UpdateTrip {
        /// Ride number.
        ride_id: u32,
        /// Requested duration.
        new_duration: u64,
    },
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line has no command name.
    #[error("empty command")]
    Empty,
    /// The name is not a known command.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    /// An argument list was opened but not closed, or text follows it.
    #[error("malformed argument list")]
    MalformedArgs,
    /// Wrong number of arguments for this command.
    #[error("`{command}` takes {expected} argument(s), got {found}")]
    Arity {
        /// Command name.
        command: &'static str,
        /// Accepted argument counts.
        expected: &'static str,
        /// Arguments supplied.
        found: usize,
    },
    /// An argument is not a non-negative integer in range.
    #[error("invalid number `{value}`")]
    InvalidNumber {
        /// The offending argument text.
        value: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

impl Command {
    /// Parses a single line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (name, args) = match line.split_once('(') {
            Some((name, rest)) => {
                let inner = rest
                    .trim_end()
                    .strip_suffix(')')
                    .ok_or(ParseError::MalformedArgs)?;
                if inner.contains(['(', ')']) {
                    return Err(ParseError::MalformedArgs);
                }
                (name.trim(), split_args(inner))
            }
            None => (line, Vec::new()),
        };

        match name {
            "" => Err(ParseError::Empty),
            "Insert" => match args.as_slice() {
                [id, cost, duration] => Ok(Self::Insert {
                    ride_id: number(id)?,
                    cost: number(cost)?,
                    duration: number(duration)?,
                }),
                _ => Err(arity("Insert", "3", &args)),
            },
            "GetNextRide" => match args.as_slice() {
                [] => Ok(Self::GetNextRide),
                _ => Err(arity("GetNextRide", "0", &args)),
            },
            "Print" => match args.as_slice() {
                [id] => Ok(Self::Print {
                    ride_id: number(id)?,
                }),
                [low, high] => Ok(Self::PrintRange {
                    low: number(low)?,
                    high: number(high)?,
                }),
                _ => Err(arity("Print", "1 or 2", &args)),
            },
            "CancelRide" => match args.as_slice() {
                [id] => Ok(Self::CancelRide {
                    ride_id: number(id)?,
                }),
                _ => Err(arity("CancelRide", "1", &args)),
            },
            "UpdateTrip" => match args.as_slice() {
                [id, duration] => Ok(Self::UpdateTrip {
                    ride_id: number(id)?,
                    new_duration: number(duration)?,
                }),
                _ => Err(arity("UpdateTrip", "2", &args)),
            },
            other => Err(ParseError::UnknownCommand(other.to_owned())),
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn split_args(inner: &str) -> Vec<&str> {
    if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    }
}

fn number<T: FromStr<Err = ParseIntError>>(arg: &str) -> Result<T, ParseError> {
    arg.parse().map_err(|source| ParseError::InvalidNumber {
        value: arg.to_owned(),
        source,
    })
}

fn arity(command: &'static str, expected: &'static str, args: &[&str]) -> ParseError {
    ParseError::Arity {
        command,
        expected,
        found: args.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Accepted forms
    // =========================================================================

    #[test]
    fn insert() {
        assert_eq!(
            Command::parse("Insert(25,98,46)"),
            Ok(Command::Insert {
                ride_id: 25,
                cost: 98,
                duration: 46
            })
        );
    }

    #[test]
    fn whitespace_tolerant() {
        assert_eq!(
            Command::parse("  Insert ( 25 , 98,46 )  "),
            Ok(Command::Insert {
                ride_id: 25,
                cost: 98,
                duration: 46
            })
        );
    }

    #[test]
    fn get_next_ride_with_and_without_parens() {
        assert_eq!(Command::parse("GetNextRide()"), Ok(Command::GetNextRide));
        assert_eq!(Command::parse("GetNextRide"), Ok(Command::GetNextRide));
        assert_eq!(Command::parse("GetNextRide( )"), Ok(Command::GetNextRide));
    }

    #[test]
    fn print_point_and_range() {
        assert_eq!(
            Command::parse("Print(9)"),
            Ok(Command::Print { ride_id: 9 })
        );
        assert_eq!(
            Command::parse("Print(10,100)"),
            Ok(Command::PrintRange { low: 10, high: 100 })
        );
    }

    #[test]
    fn cancel_and_update() {
        assert_eq!(
            "CancelRide(53)".parse::<Command>(),
            Ok(Command::CancelRide { ride_id: 53 })
        );
        assert_eq!(
            "UpdateTrip(53,15)".parse::<Command>(),
            Ok(Command::UpdateTrip {
                ride_id: 53,
                new_duration: 15
            })
        );
    }

    // =========================================================================
    // Rejected forms
    // =========================================================================

    #[test]
    fn unknown_command() {
        assert_eq!(
            Command::parse("Dispatch()"),
            Err(ParseError::UnknownCommand("Dispatch".into()))
        );
    }

    #[test]
    fn empty_and_nameless() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert_eq!(Command::parse("(1,2)"), Err(ParseError::Empty));
    }

    #[test]
    fn unclosed_or_nested_args() {
        assert_eq!(Command::parse("Print(3"), Err(ParseError::MalformedArgs));
        assert_eq!(Command::parse("Print((3))"), Err(ParseError::MalformedArgs));
        assert_eq!(Command::parse("Print(3) x"), Err(ParseError::MalformedArgs));
    }

    #[test]
    fn wrong_arity() {
        assert_eq!(
            Command::parse("Insert(1,2)"),
            Err(ParseError::Arity {
                command: "Insert",
                expected: "3",
                found: 2
            })
        );
        assert!(matches!(
            Command::parse("Print(1,2,3)"),
            Err(ParseError::Arity { found: 3, .. })
        ));
        assert!(matches!(
            Command::parse("GetNextRide(1)"),
            Err(ParseError::Arity { found: 1, .. })
        ));
    }

    #[test]
    fn invalid_numbers() {
        assert!(matches!(
            Command::parse("Insert(1,-5,3)"),
            Err(ParseError::InvalidNumber { ref value, .. }) if value == "-5"
        ));
        assert!(matches!(
            Command::parse("Print(abc)"),
            Err(ParseError::InvalidNumber { .. })
        ));
        // ride ids are 32-bit
        assert!(matches!(
            Command::parse("CancelRide(4294967296)"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Command::parse("Insert(1,,3)"),
            Err(ParseError::InvalidNumber { ref value, .. }) if value.is_empty()
        ));
    }
}
