use std::path::PathBuf;

use oneof_common::{Diagnostics, Location};
use oneof_syntax::RenderError;
use thiserror::Error;

use crate::format::FormatError;

/// Everything that stops a file from being regenerated.
#[derive(Debug, Error)]
pub enum OneofError {
    /// The input file could not be read.
    #[error("read {}: {source}", .path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input is not valid Go, one diagnostic per syntax error.
    #[error("{0}")]
    Syntax(Diagnostics),
    /// No struct carries the marker prefix.
    #[error("{0}: no oneof candidates found")]
    NoCandidate(Location),
    /// A second marker struct, reported at the second one.
    #[error(
        "{location}: duplicate oneof in this file, the previous one was {previous} at {previous_location}"
    )]
    Duplicate {
        /// The second marker.
        location: Location,
        /// Name of the first marker.
        previous: String,
        /// The first marker.
        previous_location: Location,
    },
    /// The marker name is not followed by an exported name.
    #[error("{location}: name must be {expected}, got {actual}")]
    VariantName {
        /// The marker name.
        location: Location,
        /// Canonical marker name.
        expected: String,
        /// Marker name as written.
        actual: String,
    },
    /// The marker struct is generic.
    #[error("{0}: type parameters are not allowed for oneofs")]
    TypeParameters(Location),
    /// Every unusable branch of the marker.
    #[error("{0}")]
    Branches(Diagnostics),
    /// A branch type that cannot be printed back as Go.
    #[error("{location}: rendering branch for field {branch}: {source}")]
    Render {
        /// The marker field of the branch.
        location: Location,
        /// Branch name.
        branch: String,
        /// What could not be printed.
        #[source]
        source: RenderError,
    },
    /// The formatter rejected the assembled buffer, shown with line numbers.
    #[error("{source}\n{listing}")]
    Format {
        /// The formatter's complaint.
        #[source]
        source: FormatError,
        /// The assembled buffer with line numbers.
        listing: String,
    },
    /// The output could not be written back.
    #[error("write {}: {source}", .path.display())]
    Write {
        /// File being replaced.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `gofmt` was required but is not installed.
    #[error("gofmt not found on PATH: {0}")]
    FormatterNotFound(String),
}

impl OneofError {
    /// The individual diagnostics of a batched error, one per reported line.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Syntax(diagnostics) | Self::Branches(diagnostics) => Some(diagnostics),
            _ => None,
        }
    }
}
