//! Bench errors

use std::fmt;
use std::path::{Path, PathBuf};
use crate::failure::ExperimentFailure;

/// The kind of bench error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid arguments to a setter
    Configuration,
    /// Positional command edit outside the command line
    IndexOutOfRange,
    /// Fixture path already exists
    AlreadyExists,
    /// Path is missing or has the wrong type
    NotFound,
    /// Fixture is not managed by this scope
    PermissionDenied,
    /// The process could not be started
    Launch,
    /// Captured output is not valid UTF-8
    Decode,
    /// IO error
    Io,
    /// The experiment ran but did not match its expectations
    ExperimentFailed,
}

/// An error raised while configuring or running an experiment, or while
/// managing fixtures.
#[derive(Debug)]
pub struct BenchError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Option<PathBuf>,
    failure: Option<Box<ExperimentFailure>>,
    source: Option<std::io::Error>,
}

impl BenchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
            failure: None,
            source: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_source(mut self, source: std::io::Error) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg)
    }

    pub fn index(index: isize, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfRange,
            format!("index {} out of range for command line of length {}", index, len),
        )
    }

    pub fn already_exists(path: &Path) -> Self {
        Self::new(ErrorKind::AlreadyExists, "already exists").with_path(path)
    }

    pub fn not_found(path: &Path, what: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("no such {}", what)).with_path(path)
    }

    pub fn unmanaged(path: &Path) -> Self {
        Self::new(ErrorKind::PermissionDenied, "unmanaged file").with_path(path)
    }

    pub fn launch(program: &str, e: std::io::Error) -> Self {
        Self::new(ErrorKind::Launch, format!("failed to execute '{}': {}", program, e))
            .with_source(e)
    }

    pub fn failed(failure: ExperimentFailure) -> Self {
        let mut err = Self::new(ErrorKind::ExperimentFailed, "test experiment failed");
        err.failure = Some(Box::new(failure));
        err
    }

    /// Structured details when the experiment ran but did not match.
    pub fn failure(&self) -> Option<&ExperimentFailure> {
        self.failure.as_deref()
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ErrorKind::ExperimentFailed
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref failure) = self.failure {
            return write!(f, "{}", failure);
        }
        if let Some(ref path) = self.path {
            write!(f, "{}: ", path.display())?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for BenchError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, e.to_string()).with_source(e)
    }
}
