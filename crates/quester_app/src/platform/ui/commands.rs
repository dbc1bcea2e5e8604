//! Line commands typed at the prompt.

use quester_core::{QueryCount, TimerSeconds, Volume};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch,
    Copy(usize),
    Open(usize),
    Count(QueryCount),
    Timer(TimerSeconds),
    Volume(Volume),
    Mute,
    ClearHistory,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument(String),
}

pub const HELP: &str = "commands: fetch | copy <n> | open <n> | count <1-30> | timer <1-300> \
                        | volume <0-100> | mute | clear | help | quit";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(ParseError::Empty);
    };
    let arg = words.next();

    match head.to_ascii_lowercase().as_str() {
        "f" | "fetch" => Ok(Command::Fetch),
        "c" | "copy" => ordinal(arg).map(Command::Copy),
        "o" | "open" => ordinal(arg).map(Command::Open),
        // Numeric inputs are clamped, never rejected.
        "count" => Ok(Command::Count(QueryCount::parse(arg.unwrap_or("")))),
        "timer" => Ok(Command::Timer(TimerSeconds::parse(arg.unwrap_or("")))),
        "volume" => {
            let raw = arg.ok_or(ParseError::MissingArgument("volume"))?;
            let percent: f32 = raw
                .parse()
                .map_err(|_| ParseError::InvalidArgument(raw.to_string()))?;
            Ok(Command::Volume(Volume::clamped(percent / 100.0)))
        }
        "m" | "mute" => Ok(Command::Mute),
        "clear" => Ok(Command::ClearHistory),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn ordinal(arg: Option<&str>) -> Result<usize, ParseError> {
    let raw = arg.ok_or(ParseError::MissingArgument("card number"))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidArgument(raw.to_string())),
    }
}
