//! Test bench
//!
//! The bench owns one `ExperimentSpec` and keeps it across runs, so a
//! sequence of similar experiments only needs to edit what changes.

use std::fmt;
use std::path::Path;
use crate::error::BenchError;
use crate::exec::{run_experiment, ExecutionResult};
use crate::failure::ExperimentFailure;
use crate::fields::Fields;
use crate::spec::{Expectation, ExpectedValue, ExperimentSpec};

/// Environment switch that turns on verbose mode in `TestBench::from_env`
pub const VERBOSE_ENV: &str = "UTILTEST_VERBOSE";

/// A stateful runner of test experiments against one command line utility
#[derive(Debug, Clone, Default)]
pub struct TestBench {
    spec: ExperimentSpec,
    verbose: bool,
}

impl TestBench {
    /// Create a bench with every field at its zero value.
    /// When `verbose` is set, each run first dumps the experiment to stderr.
    pub fn new(verbose: bool) -> Self {
        Self {
            spec: ExperimentSpec::new(),
            verbose,
        }
    }

    /// Create a bench that is verbose when `UTILTEST_VERBOSE` is set.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(VERBOSE_ENV).is_some())
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn spec(&self) -> &ExperimentSpec {
        &self.spec
    }

    pub fn set_command<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.command.set(tokens);
    }

    pub fn append_to_command<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spec.command.extend(tokens);
    }

    pub fn insert_into_command(&mut self, index: isize, token: impl Into<String>) -> Result<(), BenchError> {
        self.spec.command.insert(index, token)
    }

    pub fn replace_in_command(&mut self, index: isize, token: impl Into<String>) -> Result<(), BenchError> {
        self.spec.command.replace(index, token).map(|_| ())
    }

    /// Remove the token at `index`, or the last token when `index` is `None`.
    pub fn remove_from_command(&mut self, index: Option<isize>) -> Result<(), BenchError> {
        self.spec.command.remove(index).map(|_| ())
    }

    pub fn set_stdin(&mut self, text: &str) {
        self.spec.stdin = Some(text.as_bytes().to_vec());
    }

    /// Set expected exit code, stdout and stderr at once.
    pub fn set_expected(&mut self, code: i32, stdout: impl Into<String>, stderr: impl Into<String>) {
        self.spec.expected_code = code;
        self.spec.expected_stdout = stdout.into();
        self.spec.expected_stderr = stderr.into();
    }

    /// Set one expectation. `field` must be exactly one of `CODE`, `STDOUT`
    /// or `STDERR`, and `value` must be a code for `CODE` and text otherwise.
    pub fn set_expected_field(&mut self, field: Fields, value: impl Into<ExpectedValue>) -> Result<(), BenchError> {
        match (field, value.into()) {
            (f, ExpectedValue::Code(code)) if f == Fields::CODE => {
                self.spec.expected_code = code;
            }
            (f, ExpectedValue::Text(text)) if f == Fields::STDOUT => {
                self.spec.expected_stdout = text;
            }
            (f, ExpectedValue::Text(text)) if f == Fields::STDERR => {
                self.spec.expected_stderr = text;
            }
            (f, value) if f == Fields::CODE || f == Fields::STDOUT || f == Fields::STDERR => {
                return Err(BenchError::config(format!(
                    "value {:?} does not fit field {:?}", value, f
                )));
            }
            (f, _) => {
                return Err(BenchError::config(format!(
                    "field selector must be exactly one of CODE, STDOUT or STDERR, got {:?}", f
                )));
            }
        }
        Ok(())
    }

    /// Return the selected fields to their zero values; others are kept.
    pub fn reset(&mut self, what: Fields) {
        self.spec.reset(what);
    }

    pub fn add_file_check(&mut self, path: impl AsRef<Path>, expectation: impl Into<Expectation>) -> Result<(), BenchError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(BenchError::config("file check needs a non-empty path"));
        }
        self.spec.add_file_check(path, expectation.into());
        Ok(())
    }

    /// Run the experiment and return what happened without judging it.
    pub fn run(&self) -> Result<ExecutionResult, BenchError> {
        if self.verbose {
            eprintln!("{}", self.describe());
        }
        run_experiment(&self.spec)
    }

    /// Run the experiment and fail with `ErrorKind::ExperimentFailed` if
    /// the exit code, stdout, stderr or any file check does not match.
    pub fn execute(&self) -> Result<(), BenchError> {
        let result = self.run()?;
        if result.matches(&self.spec) {
            Ok(())
        } else {
            Err(BenchError::failed(ExperimentFailure::new(&self.spec, result)))
        }
    }

    /// Multi-line labelled dump of the current spec
    pub fn describe(&self) -> String {
        let spec = &self.spec;
        let mut out = String::from("-----------------------------------------------\n");
        out.push_str(&format!("command line   : {}\n", spec.command));
        match spec.stdin_text() {
            Some(s) => out.push_str(&format!("stdin          : {:?}\n", s)),
            None => out.push_str("stdin          : none\n"),
        }
        out.push_str(&format!("expected code  : {}\n", spec.expected_code));
        out.push_str(&format!("expected stdout: {:?}\n", spec.expected_stdout));
        out.push_str(&format!("expected stderr: {:?}", spec.expected_stderr));
        for check in &spec.file_checks {
            out.push_str(&format!("\nexpected file  : {}: {}", check.path.display(), check.expectation));
        }
        out
    }
}

impl fmt::Display for TestBench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = &self.spec;
        write!(
            f,
            "{:?} : {:?} : {} : {:?} : {:?}",
            spec.command.tokens(),
            spec.stdin_text(),
            spec.expected_code,
            spec.expected_stdout,
            spec.expected_stderr,
        )
    }
}
