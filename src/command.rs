//! Command line with positional editing
//!
//! Indices may be negative to count from the end: `-1` is the last token.
//! Out-of-range indices never wrap around; they fail with
//! `ErrorKind::IndexOutOfRange`.

use std::fmt;
use crate::error::BenchError;
use crate::quote::quote_command;

/// The argv of an experiment. The first token names the executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(|s| s.as_str())
    }

    pub fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn set<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = tokens.into_iter().map(Into::into).collect();
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Insert `token` so that it ends up at `index`.
    ///
    /// Valid positions run from `-len` to `len`; `len` appends and a negative
    /// index inserts before the token it addresses.
    pub fn insert(&mut self, index: isize, token: impl Into<String>) -> Result<(), BenchError> {
        let pos = self.resolve(index, true)?;
        self.tokens.insert(pos, token.into());
        Ok(())
    }

    pub fn replace(&mut self, index: isize, token: impl Into<String>) -> Result<String, BenchError> {
        let pos = self.resolve(index, false)?;
        Ok(std::mem::replace(&mut self.tokens[pos], token.into()))
    }

    /// Remove the token at `index`, or the last one when `index` is `None`.
    pub fn remove(&mut self, index: Option<isize>) -> Result<String, BenchError> {
        let pos = self.resolve(index.unwrap_or(-1), false)?;
        Ok(self.tokens.remove(pos))
    }

    fn resolve(&self, index: isize, allow_end: bool) -> Result<usize, BenchError> {
        let len = self.tokens.len();
        let pos = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            Some(index as usize)
        };
        match pos {
            Some(p) if p < len || (allow_end && p == len) => Ok(p),
            _ => Err(BenchError::index(index, len)),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote_command(&self.tokens))
    }
}
