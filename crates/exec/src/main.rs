//! Command-line runner for LS-8 programs.
//!
//! Loads a program source file into a fresh virtual machine and runs it until it halts. Values
//! printed by the program go to standard output; logs and the optional execution trace go to
//! standard error.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ls8_vm::program::Program;
use ls8_vm::trace::{NoopTrace, Trace, WriterTrace};
use ls8_vm::Vm;

#[derive(Parser, Debug)]
#[command(
    name = "ls8",
    version,
    about = "Run a program on the LS-8 virtual CPU",
    long_about = "Run a program on the LS-8 virtual CPU.\n\nPrograms are text files with one binary byte per line; `#` starts a comment.\n\nExamples:\n  ls8 demos/print8.ls8\n  ls8 --trace demos/sctest.ls8\n  RUST_LOG=ls8_vm=trace ls8 demos/mult.ls8"
)]
struct Cli {
    /// Program source file to run.
    program: PathBuf,

    /// Print the state of the machine before every instruction.
    #[arg(short, long)]
    trace: bool,

    /// Abort after this many instructions if the program has not halted.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Log filter, in `RUST_LOG` syntax. Overrides the environment.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let program = Program::from_file(&cli.program)
        .with_context(|| format!("failed to load `{}`", cli.program.display()))?;

    let mut vm = Vm::new();
    vm.set_step_limit(cli.max_steps);
    vm.load(&program)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut trace: Box<dyn Trace> = if cli.trace {
        Box::new(WriterTrace::new(io::stderr()))
    } else {
        Box::new(NoopTrace)
    };

    let result = vm.run(&mut out, trace.as_mut());
    out.flush()?;

    let executed = result.with_context(|| {
        format!(
            "execution of `{}` aborted at pc {:#04x}",
            cli.program.display(),
            vm.cpu().pc
        )
    })?;

    tracing::info!(executed, "program halted");
    Ok(())
}

/// Installs the global `tracing` subscriber, writing to standard error.
fn init_logging(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter).context("invalid log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    Ok(())
}
