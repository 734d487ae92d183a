//! Go source front end for the go-oneof workspace.
//!
//! Parsing is done by the tree-sitter Go grammar. This crate lowers the
//! package clause, imports and type declarations of its tree into an owned
//! AST and renders type expressions back to gofmt-shaped text.

pub mod ast;
pub mod parser;
pub mod print;

use oneof_common::Diagnostics;

pub use crate::ast::*;
pub use crate::print::{RenderError, render_type, render_type_at};

/// Parses a whole Go file.
///
/// # Errors
///
/// Returns every syntax error found, ordered by position.
pub fn parse_source(file: &str, src: &str) -> Result<SourceUnit, Diagnostics> {
    parser::parse_file(file, src)
}

/// Parses a lone type expression, e.g. `map[string]*oneofNode`.
///
/// # Errors
///
/// Returns every syntax error found.
pub fn parse_type_expr(src: &str) -> Result<TypeExpr, Diagnostics> {
    parser::parse_type(src)
}
