//! Generator for Go sum types.
//!
//! A Go file declares one `oneof<Name>` struct whose fields are the cases of
//! a union. The generator keeps that struct, adds an interface `<Name>` with
//! an `is<Name>()` method, and turns every field into its own type
//! implementing the interface. `*oneof<Name>` inside the field types becomes
//! `<Name>`.

pub mod assemble;
mod error;
pub mod format;
pub mod locate;
pub mod pipeline;
pub mod rewrite;
pub mod synth;

pub use crate::error::OneofError;
pub use crate::format::{Builtin, FormatError, Formatter, Gofmt};
pub use crate::pipeline::Generator;
