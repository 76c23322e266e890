//! Line-oriented command interpreter over a windowed map.
//!
//! Drives the map from text, one command per line:
//!
//! ```text
//! put <key> <value>
//! get <key>
//! lookup <key>
//! avg
//! stats
//! stats reset
//! help
//! quit
//! ```

use crate::clock::Clock;
use crate::core::{Lookup, WindowedMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Help text listing the commands.
pub const HELP: &str = "\
Commands:
  put <key> <value>   insert an integer value
  get <key>           value of key, 0 if expired or absent
  lookup <key>        value of key, reporting expired and absent separately
  avg                 average of values inserted within the window
  stats               usage counters
  stats reset         zero the usage counters
  help                show this text
  quit                leave the session";

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: i64 },
    Get { key: String },
    Lookup { key: String },
    Average,
    Stats,
    ResetStats,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid value '{0}': expected an integer")]
    InvalidValue(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match (name.to_lowercase().as_str(), args.as_slice()) {
            ("put", [key, value]) => {
                let value = value
                    .parse()
                    .map_err(|_| ParseError::InvalidValue(value.to_string()))?;
                Ok(Command::Put {
                    key: key.to_string(),
                    value,
                })
            }
            ("put", _) => Err(ParseError::Usage("put <key> <value>")),
            ("get", [key]) => Ok(Command::Get {
                key: key.to_string(),
            }),
            ("get", _) => Err(ParseError::Usage("get <key>")),
            ("lookup", [key]) => Ok(Command::Lookup {
                key: key.to_string(),
            }),
            ("lookup", _) => Err(ParseError::Usage("lookup <key>")),
            ("avg" | "average", []) => Ok(Command::Average),
            ("stats", []) => Ok(Command::Stats),
            ("stats", ["reset"]) => Ok(Command::ResetStats),
            ("stats", _) => Err(ParseError::Usage("stats [reset]")),
            ("help" | "?", []) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            ("avg" | "average" | "help" | "?" | "quit" | "exit", _) => {
                Err(ParseError::Usage("command takes no arguments"))
            }
            (other, _) => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        line.parse()
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Stored,
    Value(i64),
    Lookup(Lookup),
    Average(f64),
    Text(String),
    Quit,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stored => write!(f, "OK"),
            Output::Value(value) => write!(f, "{value}"),
            Output::Lookup(Lookup::Live(value)) => write!(f, "{value}"),
            Output::Lookup(Lookup::Expired) => write!(f, "(expired)"),
            Output::Lookup(Lookup::Absent) => write!(f, "(absent)"),
            Output::Average(mean) => write!(f, "{mean}"),
            Output::Text(text) => write!(f, "{text}"),
            Output::Quit => write!(f, "bye"),
        }
    }
}

/// A map plus the commands that act on it.
pub struct Session<C: Clock> {
    map: WindowedMap<C>,
}

impl<C: Clock> Session<C> {
    pub fn new(map: WindowedMap<C>) -> Self {
        Self { map }
    }

    /// Run one command against the map.
    pub fn execute(&mut self, command: &Command) -> Output {
        match command {
            Command::Put { key, value } => {
                self.map.put(key.as_str(), *value);
                Output::Stored
            }
            Command::Get { key } => Output::Value(self.map.get(key)),
            Command::Lookup { key } => Output::Lookup(self.map.lookup(key)),
            Command::Average => Output::Average(self.map.get_average()),
            Command::Stats => Output::Text(self.map.stats().summary()),
            Command::ResetStats => {
                self.map.reset_stats();
                Output::Text("Statistics reset".to_string())
            }
            Command::Help => Output::Text(HELP.to_string()),
            Command::Quit => Output::Quit,
        }
    }

    /// Parse and run one line.
    pub fn execute_line(&mut self, line: &str) -> Result<Output, ParseError> {
        let command = Command::parse(line)?;
        Ok(self.execute(&command))
    }

    pub fn map(&self) -> &WindowedMap<C> {
        &self.map
    }
}
