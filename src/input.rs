//! Interactive prompts.
//!
//! Every prompt returns an already-validated answer. Invalid entries are
//! logged and asked again; the caller never sees them.

use crate::error::{LedgerError, Result};
use crate::value::{InputKind, Value};
use log::info;
use regex::Regex;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::OnceLock;

/// Input collaborator used by the engine.
pub trait Prompter {
    /// Shows an informational screen and waits for Enter.
    fn pause(&mut self, message: &str) -> Result<()>;

    /// Shows a message without waiting.
    fn say(&mut self, message: &str) -> Result<()>;

    /// Asks a yes/no question.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Asks for non-empty free text.
    fn text(&mut self, prompt: &str) -> Result<String>;

    /// Asks for a whole number within the inclusive bounds.
    fn integer(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>) -> Result<i64>;

    /// Asks for text matching `pattern`.
    fn matching(&mut self, prompt: &str, pattern: &Regex) -> Result<String>;
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("decimal pattern is valid"))
}

/// Collects a value using the strategy for `kind`.
///
/// Integer entries are counts or meter readings and are never negative.
pub fn prompt_value<P: Prompter + ?Sized>(
    prompter: &mut P,
    kind: InputKind,
    prompt: &str,
) -> Result<Value> {
    match kind {
        InputKind::Integer => Ok(Value::Int(prompter.integer(prompt, Some(0), None)?)),
        InputKind::Decimal => loop {
            let raw = prompter.matching(prompt, decimal_pattern())?;
            match Decimal::from_str(&raw) {
                Ok(d) => return Ok(Value::Decimal(d)),
                Err(e) => {
                    info!("Rejected decimal entry '{}': {}", raw, e);
                    prompter.say("That number is too large. Please try again.")?;
                }
            }
        },
        InputKind::Text => Ok(Value::Text(prompter.text(prompt)?)),
    }
}

/// Line-oriented prompter over any reader/writer pair.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use thermo_ledger::{ConsoleInput, Prompter};
///
/// let mut input = ConsoleInput::new(Cursor::new("maybe\nyes\n"), Vec::new());
/// assert!(input.confirm("Continue? (yes/no)\n").unwrap());
/// ```
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        ConsoleInput { reader, writer }
    }

    /// Returns the writer, e.g. to inspect what was shown.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Shows `prompt` and reads one trimmed line. Lines that are not valid
    /// UTF-8 are rejected and asked again.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        loop {
            write!(self.writer, "{}", prompt)?;
            self.writer.flush()?;

            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Err(LedgerError::InputClosed);
            }
            match String::from_utf8(line) {
                Ok(text) => return Ok(text.trim().to_string()),
                Err(e) => {
                    let entry = String::from_utf8_lossy(e.as_bytes()).trim().to_string();
                    self.reject(&entry, "This response is invalid.")?;
                }
            }
        }
    }

    fn reject(&mut self, entry: &str, reason: &str) -> Result<()> {
        info!("Rejected entry '{}': {}", entry, reason);
        writeln!(self.writer, "{}", reason)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompter for ConsoleInput<R, W> {
    fn pause(&mut self, message: &str) -> Result<()> {
        self.ask(message).map(|_| ())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let entry = self.ask(prompt)?;
            match entry.to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.reject(&entry, "Please respond with 'yes' or 'no'.")?,
            }
        }
    }

    fn text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let entry = self.ask(prompt)?;
            if !entry.is_empty() {
                return Ok(entry);
            }
            self.reject(&entry, "Blank values are not allowed.")?;
        }
    }

    fn integer(&mut self, prompt: &str, min: Option<i64>, max: Option<i64>) -> Result<i64> {
        loop {
            let entry = self.ask(prompt)?;
            let number = match i64::from_str(&entry) {
                Ok(n) => n,
                Err(_) => {
                    self.reject(&entry, "Please enter a whole number.")?;
                    continue;
                }
            };
            if let Some(min) = min.filter(|m| number < *m) {
                self.reject(&entry, &format!("Number must be at minimum {}.", min))?;
                continue;
            }
            if let Some(max) = max.filter(|m| number > *m) {
                self.reject(&entry, &format!("Number must be at maximum {}.", max))?;
                continue;
            }
            return Ok(number);
        }
    }

    fn matching(&mut self, prompt: &str, pattern: &Regex) -> Result<String> {
        loop {
            let entry = self.ask(prompt)?;
            if pattern.is_match(&entry) {
                return Ok(entry);
            }
            self.reject(&entry, "This response is invalid.")?;
        }
    }
}
