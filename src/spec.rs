//! Experiment specification
//!
//! Holds what the bench runs and what it expects back. A `TestBench` owns
//! one spec and edits it in place between experiments.

use std::fmt;
use std::path::{Path, PathBuf};
use crate::command::CommandLine;
use crate::fields::Fields;

/// What a file check expects to find at its path after the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    MustExist,
    MustNotExist,
    /// The file exists and holds exactly these contents
    Contents(String),
}

impl From<&str> for Expectation {
    fn from(s: &str) -> Self {
        Expectation::Contents(s.to_string())
    }
}

impl From<String> for Expectation {
    fn from(s: String) -> Self {
        Expectation::Contents(s)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::MustExist => write!(f, "must exist"),
            Expectation::MustNotExist => write!(f, "must not exist"),
            Expectation::Contents(s) => write!(f, "contents {:?}", s),
        }
    }
}

/// A single (path, expectation) assertion evaluated after the process exits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub path: PathBuf,
    pub expectation: Expectation,
}

/// A value for `TestBench::set_expected_field`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedValue {
    Code(i32),
    Text(String),
}

impl From<i32> for ExpectedValue {
    fn from(code: i32) -> Self {
        ExpectedValue::Code(code)
    }
}

impl From<&str> for ExpectedValue {
    fn from(s: &str) -> Self {
        ExpectedValue::Text(s.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(s: String) -> Self {
        ExpectedValue::Text(s)
    }
}

/// The mutable description of one experiment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentSpec {
    pub command: CommandLine,
    /// `None` means the child gets no stdin pipe content at all
    pub stdin: Option<Vec<u8>>,
    pub expected_code: i32,
    pub expected_stdout: String,
    pub expected_stderr: String,
    pub file_checks: Vec<FileCheck>,
}

impl ExperimentSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the selected fields to their zero values.
    pub fn reset(&mut self, what: Fields) {
        if what.contains(Fields::CMD) {
            self.command.clear();
        }
        if what.contains(Fields::STDIN) {
            self.stdin = None;
        }
        if what.contains(Fields::CODE) {
            self.expected_code = 0;
        }
        if what.contains(Fields::STDOUT) {
            self.expected_stdout.clear();
        }
        if what.contains(Fields::STDERR) {
            self.expected_stderr.clear();
        }
        if what.contains(Fields::FILES) {
            self.file_checks.clear();
        }
    }

    pub fn stdin_text(&self) -> Option<String> {
        self.stdin.as_ref().map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn add_file_check(&mut self, path: &Path, expectation: Expectation) {
        self.file_checks.push(FileCheck {
            path: path.to_path_buf(),
            expectation,
        });
    }
}
