use crossbeam_channel as cbc;
use log::{debug, warn};
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlInput {
    Call(u8),
    Status,
    Shutdown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error("\"{0}\" is not a floor number")]
    InvalidFloor(String),
}

fn parse_floor(text: &str) -> Result<u8, InputError> {
    text.parse::<u8>()
        .map_err(|_| InputError::InvalidFloor(text.to_string()))
}

impl FromStr for ControlInput {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(InputError::Empty);
        };

        match first.to_ascii_lowercase().as_str() {
            "call" => match words.next() {
                Some(floor) => Ok(ControlInput::Call(parse_floor(floor)?)),
                None => Err(InputError::InvalidFloor(String::new())),
            },
            "status" | "s" => Ok(ControlInput::Status),
            "quit" | "q" | "exit" => Ok(ControlInput::Shutdown),
            word if word.chars().all(|c| c.is_ascii_digit()) => Ok(ControlInput::Call(parse_floor(word)?)),
            word => Err(InputError::UnknownCommand(word.to_string())),
        }
    }
}

/// Reads one command per line and forwards it. Returns when the reader is
/// exhausted, the controller hangs up, or a shutdown was forwarded.
pub fn call_buttons<R: BufRead>(reader: R, input_tx: cbc::Sender<ControlInput>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ControlInput>() {
            Ok(input) => {
                debug!("input: {:?}", input);
                if input_tx.send(input).is_err() || input == ControlInput::Shutdown {
                    break;
                }
            }
            Err(e) => warn!("ignoring input: {}", e),
        }
    }
}
