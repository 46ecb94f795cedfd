//! Interactive command session
//!
//! Reads one command per line and applies it to the loaded sensor store:
//! `print <i>`, `analyze <i>`, `clear` and `exit`. End of input behaves like
//! `exit`.

use crate::config::OutputFormat;
use crate::operations::OperationMessages;
use crate::report;
use anyhow::Result;
use sensor_log_decoder::{OperationTable, SensorError, SensorStore};
use std::io::{BufRead, Write};
use std::str::FromStr;

const OUT_OF_RANGE: &str = "Index not in range!";

/// One parsed operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Print(i64),
    Analyze(i64),
    Clear,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Missing index for `{0}`")]
    MissingIndex(&'static str),

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Unknown command: {0}")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();

        match name {
            "print" => parse_index("print", parts.next()).map(Command::Print),
            "analyze" => parse_index("analyze", parts.next()).map(Command::Analyze),
            "clear" => Ok(Command::Clear),
            "exit" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

fn parse_index(command: &'static str, arg: Option<&str>) -> std::result::Result<i64, CommandError> {
    let arg = arg.ok_or(CommandError::MissingIndex(command))?;
    arg.parse()
        .map_err(|_| CommandError::InvalidIndex(arg.to_string()))
}

/// Whether the session keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Command loop state: the store and the operations available to `analyze`
pub struct Session {
    store: SensorStore,
    table: OperationTable,
    messages: OperationMessages,
    format: OutputFormat,
}

impl Session {
    pub fn new(store: SensorStore, table: OperationTable, format: OutputFormat) -> Self {
        Self {
            store,
            table,
            messages: OperationMessages::new(),
            format,
        }
    }

    /// Write status lines the table's operations push to `messages` after each `analyze`
    pub fn with_messages(mut self, messages: OperationMessages) -> Self {
        self.messages = messages;
        self
    }

    pub fn store(&self) -> &SensorStore {
        &self.store
    }

    /// Run commands from `input` until `exit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command, output)? == Flow::Stop {
                        break;
                    }
                }
                Err(CommandError::Unknown(text)) => {
                    log::warn!("Ignoring unknown command: {}", text);
                }
                Err(e) => writeln!(output, "{}", e)?,
            }
            output.flush()?;
        }

        log::debug!("Session finished with {} sensors", self.store.len());
        Ok(())
    }

    /// Execute a single command
    pub fn execute<W: Write>(&mut self, command: Command, output: &mut W) -> Result<Flow> {
        match command {
            Command::Print(index) => {
                match usize::try_from(index).map(|i| self.store.snapshot(i)) {
                    Ok(Ok(snapshot)) => report::render(output, &snapshot, self.format)?,
                    Ok(Err(e)) => self.report_error(e, output)?,
                    Err(_) => writeln!(output, "{}", OUT_OF_RANGE)?,
                }
            }
            Command::Analyze(index) => {
                match usize::try_from(index).map(|i| (i, self.store.analyze(i, &self.table))) {
                    Ok((i, Ok(_))) => {
                        report::render_messages(output, i, &self.messages.drain(), self.format)?
                    }
                    Ok((_, Err(e))) => {
                        self.messages.drain();
                        self.report_error(e, output)?
                    }
                    Err(_) => writeln!(output, "{}", OUT_OF_RANGE)?,
                }
            }
            Command::Clear => {
                self.store.compact();
            }
            Command::Exit => return Ok(Flow::Stop),
        }

        Ok(Flow::Continue)
    }

    fn report_error<W: Write>(&self, error: SensorError, output: &mut W) -> Result<()> {
        match error {
            SensorError::IndexOutOfRange { .. } => writeln!(output, "{}", OUT_OF_RANGE)?,
            other => writeln!(output, "{}", other)?,
        }
        Ok(())
    }
}
