//! Common utilities and shared types for the go-oneof workspace.
//!
//! This crate provides configuration handling, source positions and the
//! diagnostics collector, and Go identifier casing rules used across the
//! parser and the generator.

pub mod casing;
mod config;
mod diagnostics;

pub use crate::config::*;
pub use crate::diagnostics::*;
