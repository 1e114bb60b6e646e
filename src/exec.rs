//! Process execution
//!
//! Runs one child with piped stdin/stdout/stderr and waits for it.
//! Stdin is fed from a separate thread while `wait_with_output` drains
//! both output pipes, so a child that fills a pipe buffer before reading
//! all of its input cannot deadlock the bench.

use std::io::Write;
use std::process::{Command as ProcessCommand, Stdio};
use crate::checks::{check_files, FailedCheck};
use crate::error::{BenchError, ErrorKind};
use crate::spec::ExperimentSpec;

/// What one run actually produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` if the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub failed_files: Vec<FailedCheck>,
}

impl ExecutionResult {
    /// Whether this result satisfies every expectation in `spec`.
    pub fn matches(&self, spec: &ExperimentSpec) -> bool {
        self.exit_code == Some(spec.expected_code)
            && self.stdout == spec.expected_stdout
            && self.stderr == spec.expected_stderr
            && self.failed_files.is_empty()
    }
}

/// Run the experiment's command to completion, then evaluate its file checks.
pub fn run_experiment(spec: &ExperimentSpec) -> Result<ExecutionResult, BenchError> {
    let program = spec.command.program()
        .ok_or_else(|| BenchError::config("empty command line"))?;

    let mut cmd = ProcessCommand::new(program);
    cmd.args(spec.command.args());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.stdin(if spec.stdin.is_some() { Stdio::piped() } else { Stdio::null() });

    let mut child = cmd.spawn().map_err(|e| BenchError::launch(program, e))?;

    let writer = match (child.stdin.take(), spec.stdin.clone()) {
        (Some(mut pipe), Some(data)) => Some(std::thread::spawn(move || {
            // Dropping the pipe at the end of the closure closes the child's stdin.
            match pipe.write_all(&data) {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        })),
        _ => None,
    };

    let output = child.wait_with_output()?;

    if let Some(handle) = writer {
        handle.join()
            .map_err(|_| BenchError::new(ErrorKind::Io, "stdin writer thread panicked"))??;
    }

    let stdout = decode(output.stdout, "stdout")?;
    let stderr = decode(output.stderr, "stderr")?;
    let failed_files = check_files(&spec.file_checks);

    Ok(ExecutionResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        failed_files,
    })
}

fn decode(bytes: Vec<u8>, stream: &str) -> Result<String, BenchError> {
    String::from_utf8(bytes).map_err(|e| {
        BenchError::new(ErrorKind::Decode, format!("{} is not valid UTF-8: {}", stream, e.utf8_error()))
    })
}
