//! Failure report for an experiment that ran but did not match

use std::fmt;
use similar::TextDiff;
use crate::checks::FailedCheck;
use crate::exec::ExecutionResult;
use crate::spec::ExperimentSpec;

/// Everything needed to diagnose a failed experiment without re-running it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentFailure {
    /// Shell-quoted command line, for display
    pub command_line: String,
    pub command: Vec<String>,
    pub stdin: Option<String>,
    pub expected_code: i32,
    pub actual_code: Option<i32>,
    pub expected_stdout: String,
    pub actual_stdout: String,
    pub expected_stderr: String,
    pub actual_stderr: String,
    pub failed_files: Vec<FailedCheck>,
}

impl ExperimentFailure {
    pub fn new(spec: &ExperimentSpec, result: ExecutionResult) -> Self {
        Self {
            command_line: spec.command.to_string(),
            command: spec.command.tokens().to_vec(),
            stdin: spec.stdin_text(),
            expected_code: spec.expected_code,
            actual_code: result.exit_code,
            expected_stdout: spec.expected_stdout.clone(),
            actual_stdout: result.stdout,
            expected_stderr: spec.expected_stderr.clone(),
            actual_stderr: result.stderr,
            failed_files: result.failed_files,
        }
    }

    pub fn code_matches(&self) -> bool {
        self.actual_code == Some(self.expected_code)
    }

    pub fn stdout_matches(&self) -> bool {
        self.actual_stdout == self.expected_stdout
    }

    pub fn stderr_matches(&self) -> bool {
        self.actual_stderr == self.expected_stderr
    }
}

impl fmt::Display for ExperimentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test experiment failed.")?;
        writeln!(f, "Details:")?;
        writeln!(f, "    command line: {}", self.command_line)?;
        match self.stdin {
            Some(ref s) => writeln!(f, "    stdin:        {:?}", s)?,
            None => writeln!(f, "    stdin:        none")?,
        }
        writeln!(f, "    return code:")?;
        writeln!(f, "        expected: {}", self.expected_code)?;
        match self.actual_code {
            Some(code) => writeln!(f, "        returned: {}", code)?,
            None => writeln!(f, "        returned: none (terminated by signal)")?,
        }
        writeln!(f, "    stdout:")?;
        writeln!(f, "        expected: {:?}", self.expected_stdout)?;
        writeln!(f, "        returned: {:?}", self.actual_stdout)?;
        writeln!(f, "    stderr:")?;
        writeln!(f, "        expected: {:?}", self.expected_stderr)?;
        write!(f, "        returned: {:?}", self.actual_stderr)?;

        if !self.failed_files.is_empty() {
            write!(f, "\n    files:")?;
            for failed in &self.failed_files {
                write!(f, "\n        {}", failed)?;
            }
        }

        if !self.stdout_matches() {
            write_diff(f, "stdout", &self.expected_stdout, &self.actual_stdout)?;
        }
        if !self.stderr_matches() {
            write_diff(f, "stderr", &self.expected_stderr, &self.actual_stderr)?;
        }
        Ok(())
    }
}

fn write_diff(f: &mut fmt::Formatter<'_>, stream: &str, expected: &str, actual: &str) -> fmt::Result {
    let diff = TextDiff::from_lines(expected, actual);
    let udiff = diff.unified_diff()
        .header(&format!("expected {}", stream), &format!("actual {}", stream))
        .to_string();
    write!(f, "\n{}", udiff.trim_end())
}
