//! Line-oriented command harnesses for exercising a table by hand or from a
//! batch file.
//!
//! Both harnesses read whitespace-separated tokens. In batch mode every command
//! is echoed after its prompt so a transcript reads like an interactive session,
//! and `X` hands control over to the keyboard.

mod router;
mod table;

use std::{
    collections::VecDeque,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::error::DriverError;

pub use router::RouterDriver;
pub use table::TableDriver;

/// Whitespace-separated token reader.
pub struct Tokens {
    /// Where tokens currently come from
    source: Box<dyn BufRead>,
    /// Keyboard reader held back while a batch file is being read
    keyboard: Option<Box<dyn BufRead>>,
    /// Tokens split off the current line and not consumed yet
    pending: VecDeque<String>,
}

impl Tokens {
    /// Reads from `keyboard` only
    #[must_use]
    pub fn interactive(keyboard: Box<dyn BufRead>) -> Self {
        Self { source: keyboard, keyboard: None, pending: VecDeque::new() }
    }

    /// Reads from `batch` until [`Tokens::switch_to_keyboard`] is called
    #[must_use]
    pub fn batch(batch: Box<dyn BufRead>, keyboard: Box<dyn BufRead>) -> Self {
        Self { source: batch, keyboard: Some(keyboard), pending: VecDeque::new() }
    }

    /// Standard input alone, or the batch file at `batch` followed by standard
    /// input.
    ///
    /// # Errors
    ///
    /// Fails if the batch file cannot be opened.
    pub fn open(batch: Option<&Path>) -> io::Result<Self> {
        let keyboard: Box<dyn BufRead> = Box::new(io::stdin().lock());
        match batch {
            Some(path) => Ok(Self::batch(Box::new(BufReader::new(File::open(path)?)), keyboard)),
            None => Ok(Self::interactive(keyboard)),
        }
    }

    /// True while reading a batch file
    #[must_use]
    pub fn is_batch(&self) -> bool {
        self.keyboard.is_some()
    }

    /// Drops the rest of the batch file and continues from the keyboard.
    /// Returns false if already reading the keyboard.
    pub fn switch_to_keyboard(&mut self) -> bool {
        match self.keyboard.take() {
            Some(keyboard) => {
                self.source = keyboard;
                self.pending.clear();
                true
            }
            None => false,
        }
    }

    /// Next token.
    ///
    /// # Errors
    ///
    /// [`DriverError::EndOfInput`] when the source is exhausted, or the read
    /// failure.
    pub fn next_token(&mut self) -> Result<String, DriverError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.source.read_line(&mut line)? == 0 {
                return Err(DriverError::EndOfInput);
            }
            self.pending.extend(line.split_whitespace().map(str::to_owned));
        }
        self.pending.pop_front().ok_or(DriverError::EndOfInput)
    }

    /// Next single-character command. Anything glued to the command character
    /// is kept as the following token, so `+key` reads like `+ key`.
    ///
    /// # Errors
    ///
    /// As [`Tokens::next_token`].
    pub fn next_command(&mut self) -> Result<char, DriverError> {
        let token = self.next_token()?;
        let mut chars = token.chars();
        let command = chars.next().ok_or(DriverError::EndOfInput)?;
        let rest = chars.as_str();
        if !rest.is_empty() {
            self.pending.push_front(rest.to_owned());
        }
        Ok(command)
    }

    /// Next token parsed as `T`.
    ///
    /// # Errors
    ///
    /// As [`Tokens::next_token`], or [`DriverError::Malformed`] naming
    /// `expected` if the token does not parse.
    pub fn next_parsed<T: FromStr>(&mut self, expected: &'static str) -> Result<T, DriverError> {
        let token = self.next_token()?;
        token.parse().map_err(|_| DriverError::Malformed { expected, token })
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("batch", &self.is_batch())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// What the command loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Read the next command
    Continue,
    /// Leave the loop
    Quit,
}

/// Echoes the arguments of a command when running from a batch file
fn echo<W: io::Write + ?Sized>(tokens: &Tokens, out: &mut W, parts: &[&str]) -> io::Result<()> {
    if tokens.is_batch() {
        writeln!(out, "{}", parts.join(" "))?;
    }
    Ok(())
}

/// True for the "0" file name that means standard output or abort
fn is_screen(name: &str) -> bool {
    name.starts_with('0')
}
