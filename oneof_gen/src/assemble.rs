//! Puts the output file together before it is formatted.

use oneof_common::Config;
use oneof_syntax::SourceUnit;

use crate::locate::Marker;

/// The `//go:generate` line that reruns the generator on `base`.
pub fn directive(config: &Config, base: &str) -> String {
    if config.pointer {
        format!("//go:generate {} --pointer {base}", config.generator)
    } else {
        format!("//go:generate {} {base}", config.generator)
    }
}

/// Assembles header, package clause, directive, imports, the marker as
/// written and the rendered artifacts, in that order.
///
/// Everything else the input declared is dropped; the output is regenerated
/// from the marker alone.
pub fn assemble(
    unit: &SourceUnit,
    marker: &Marker,
    directive: &str,
    artifacts: &str,
) -> String {
    let mut out = String::new();
    if let Some(header) = &unit.header {
        out.push_str(header);
    }
    out.push_str(&format!("package {}\n\n{directive}\n\n", unit.package.name));

    if !unit.imports.is_empty() {
        out.push_str("import (\n");
        for spec in &unit.imports {
            out.push('\t');
            out.push_str(&spec.to_source());
            out.push('\n');
        }
        out.push_str(")\n\n");
    }

    out.push_str("type ");
    out.push_str(&marker.text);
    out.push_str("\n\n");
    out.push_str(artifacts);
    out
}
