//! go-oneof CLI
//!
//! Regenerates the sum type declared by the `oneof<Name>` struct of a Go
//! file, in place.

mod args;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use oneof_gen::{Generator, OneofError};
use tracing_subscriber::EnvFilter;

use args::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report(&err, &mut io::stderr().lock());
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), OneofError> {
    let generator = Generator::new(args.to_config())?;
    tracing::info!(file = %args.file.display(), "generating oneof");
    generator.run(&args.file)
}

/// Writes `err` to `out`, one line per diagnostic.
fn report(err: &OneofError, out: &mut impl Write) -> io::Result<()> {
    match err.diagnostics() {
        Some(diagnostics) => {
            for diagnostic in diagnostics {
                writeln!(out, "{diagnostic}")?;
            }
        }
        None => writeln!(out, "{err}")?,
    }
    Ok(())
}
