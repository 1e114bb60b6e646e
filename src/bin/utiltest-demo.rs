//! utiltest-demo
//!
//! Walk through a series of experiments against standard utilities. The
//! last one fails on purpose to show what a failure report looks like.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use utiltest::{Expectation, Fields, Fixtures, TestBench};

#[derive(Parser, Debug)]
#[command(name = "utiltest-demo")]
#[command(version)]
#[command(about = "Run example test experiments against standard utilities")]
struct Cli {
    /// Dump each experiment before running it
    #[arg(short, long)]
    verbose: bool,

    /// Leave fixture files on disk
    #[arg(short = 'k', long = "keep")]
    keep: bool,

    /// Skip the experiment that is designed to fail
    #[arg(long = "no-failure")]
    no_failure: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    let mut tb = TestBench::new(cli.verbose);

    tb.set_command(["echo", "hello", "world"]);
    tb.set_expected(0, "hello world\n", "");
    tb.execute().context("echo")?;
    println!("PASS  echo");

    // Same expectations as before, only the command and stdin change.
    tb.set_command(["cat"]);
    tb.set_stdin("hello world\n");
    tb.execute().context("cat with stdin")?;
    println!("PASS  cat with stdin");

    tb.set_command(["false"]);
    tb.reset(Fields::STDOUT | Fields::STDIN | Fields::STDERR);
    tb.set_expected_field(Fields::CODE, 1)?;
    tb.execute().context("false")?;
    println!("PASS  false");

    tb.append_to_command(["ignored", "arguments", "-and", "--options"]);
    tb.execute().context("false with arguments")?;
    println!("PASS  false with arguments");

    files_demo(cli)?;
    println!("PASS  file checks");

    if !cli.no_failure {
        // The expected code is still 1, so this run must fail.
        tb.replace_in_command(0, "true")?;
        match tb.execute() {
            Err(e) if e.is_failure() => {
                println!("FAIL  true (expected)");
                for line in e.to_string().lines() {
                    println!("      {}", line);
                }
            }
            Err(e) => return Err(e).context("true"),
            Ok(()) => anyhow::bail!("true: experiment passed but was expected to fail"),
        }
    }

    Ok(())
}

fn files_demo(cli: &Cli) -> Result<()> {
    let tmp = tempfile::Builder::new()
        .prefix("utiltest-demo-")
        .tempdir()
        .context("failed to create scratch directory")?;

    let mut fx = Fixtures::new();
    fx.preserve(cli.keep);

    let dir = tmp.path().join("work");
    let src = dir.join("input.txt");
    let dst = dir.join("copy.txt");
    fx.create_dir(&dir)?;
    fx.create_file(&src, "copied text\n")?;

    let mut tb = TestBench::new(cli.verbose);
    tb.set_command(["cp", &*src.to_string_lossy(), &*dst.to_string_lossy()]);
    tb.add_file_check(&src, Expectation::MustExist)?;
    tb.add_file_check(&dst, "copied text\n")?;
    tb.execute().context("cp")?;

    // cp created the copy; the scope has to know about it to empty the directory.
    fx.track_file(&dst)?;
    fx.close().context("cleanup")?;

    if cli.keep {
        let kept = tmp.keep();
        println!("      kept {}", kept.display());
    }
    Ok(())
}
