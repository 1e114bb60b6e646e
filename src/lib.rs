//! utiltest: black-box test experiments for command line utilities
//!
//! # Overview
//!
//! A [`TestBench`] holds the description of one experiment: the command
//! line, optional stdin, the expected exit code, stdout and stderr, and a
//! list of file checks. [`TestBench::execute`] runs the command, waits for
//! it, evaluates the file checks and returns an error carrying an
//! [`ExperimentFailure`] if anything does not match.
//!
//! The bench keeps its state between runs, so related experiments only
//! change what differs and [`TestBench::reset`] clears selected [`Fields`].
//!
//! ```rust,no_run
//! use utiltest::{Fields, TestBench};
//!
//! # fn main() -> Result<(), utiltest::BenchError> {
//! let mut tb = TestBench::new(false);
//! tb.set_command(["echo", "hello", "world"]);
//! tb.set_expected(0, "hello world\n", "");
//! tb.execute()?;
//!
//! tb.set_command(["cat"]);
//! tb.set_stdin("hello world\n");
//! tb.execute()?;
//!
//! tb.set_command(["false"]);
//! tb.reset(Fields::STDIN | Fields::STDOUT | Fields::STDERR);
//! tb.set_expected_field(Fields::CODE, 1)?;
//! tb.execute()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Fixtures`] creates and tracks files, directories and symlinks for a
//! test and removes them again when it goes out of scope.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `UTILTEST_VERBOSE` | [`TestBench::from_env`] dumps each spec to stderr |
//! | `UTILTEST_KEEP` | [`Fixtures::from_env`] leaves fixtures on disk |

mod bench;
mod checks;
mod command;
mod error;
mod exec;
mod failure;
mod fields;
mod fixtures;
mod quote;
mod spec;

pub use bench::{TestBench, VERBOSE_ENV};
pub use checks::{check_files, FailedCheck, FailureReason};
pub use command::CommandLine;
pub use error::{BenchError, ErrorKind};
pub use exec::{run_experiment, ExecutionResult};
pub use failure::ExperimentFailure;
pub use fields::Fields;
pub use fixtures::{Fixtures, Origin, ResourceKind, TrackedResource, KEEP_ENV};
pub use quote::{quote_command, quote_token};
pub use spec::{Expectation, ExpectedValue, ExperimentSpec, FileCheck};
