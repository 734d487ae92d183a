//! Canonical layout for generated files.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use itertools::Itertools;
use lazy_static::lazy_static;
use oneof_common::FormatterChoice;
use regex::Regex;
use thiserror::Error;

use crate::OneofError;

/// Why a buffer could not be formatted.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The formatter refused the source, with its own message.
    #[error("{0}")]
    Rejected(String),
    /// The formatter could not be run.
    #[error("failed to run gofmt: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns an assembled buffer into its canonical layout.
pub trait Formatter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns `source` in canonical layout.
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// The `gofmt` binary, fed through stdin.
#[derive(Debug, Clone)]
pub struct Gofmt {
    path: PathBuf,
}

impl Gofmt {
    /// Finds `gofmt` in a `PATH`-style list of directories.
    pub fn locate_in<P: AsRef<OsStr>>(paths: Option<P>) -> Result<Self, which::Error> {
        Ok(Self {
            path: which::which_in("gofmt", paths, ".")?,
        })
    }

    /// Uses the binary at `path` without checking that it exists.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Formatter for Gofmt {
    fn name(&self) -> &'static str {
        "gofmt"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // gofmt reads all of stdin before it writes anything.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes())?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormatError::Rejected(stderr.trim_end().to_string()));
        }
        String::from_utf8(output.stdout).map_err(|e| FormatError::Rejected(e.to_string()))
    }
}

lazy_static! {
    static ref BLANK_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Formatter used when `gofmt` is not available.
///
/// It checks that the buffer still parses and normalizes whitespace between
/// lines. Generated declarations are already printed in gofmt layout, so
/// this is enough for the files the generator writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl Formatter for Builtin {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn format(&self, source: &str) -> Result<String, FormatError> {
        oneof_syntax::parse_source("<output>", source)
            .map_err(|diags| FormatError::Rejected(diags.to_string()))?;

        let trimmed = source.lines().map(str::trim_end).join("\n");
        let collapsed = BLANK_RUNS.replace_all(&trimmed, "\n\n");
        Ok(format!("{}\n", collapsed.trim_matches('\n')))
    }
}

/// Picks the formatter for `choice`, looking for `gofmt` on `PATH`.
///
/// # Errors
///
/// Fails when `gofmt` is required but cannot be found.
pub fn formatter_for(choice: FormatterChoice) -> Result<Box<dyn Formatter>, OneofError> {
    formatter_in(choice, std::env::var_os("PATH"))
}

/// Picks the formatter for `choice`, looking for `gofmt` in `paths`.
///
/// # Errors
///
/// Fails when `gofmt` is required but cannot be found.
pub fn formatter_in<P: AsRef<OsStr>>(
    choice: FormatterChoice,
    paths: Option<P>,
) -> Result<Box<dyn Formatter>, OneofError> {
    match choice {
        FormatterChoice::Builtin => Ok(Box::new(Builtin)),
        FormatterChoice::Gofmt => match Gofmt::locate_in(paths) {
            Ok(gofmt) => Ok(Box::new(gofmt)),
            Err(e) => Err(OneofError::FormatterNotFound(e.to_string())),
        },
        FormatterChoice::Auto => match Gofmt::locate_in(paths) {
            Ok(gofmt) => Ok(Box::new(gofmt)),
            Err(e) => {
                tracing::warn!(error = %e, "gofmt not found, using the built-in formatter");
                Ok(Box::new(Builtin))
            }
        },
    }
}

/// `source` with zero-padded, 1-based line numbers.
pub fn numbered_listing(source: &str) -> String {
    let lines: Vec<_> = source.split('\n').collect();
    let width = (lines.len() + 1).to_string().len();
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:0width$} {line}\n", i + 1))
        .collect()
}
