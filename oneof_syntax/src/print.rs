//! Renders type expressions the way gofmt lays them out.
//!
//! Struct bodies are indented with tabs and their field names, types and
//! tags are aligned with spaces in sections. A section ends at an embedded
//! field and right after a field whose type spans several lines, which is
//! where gofmt breaks its alignment too.

use itertools::Itertools;
use oneof_common::casing::is_identifier;
use thiserror::Error;

use super::ast::{ChanDir, Field, InterfaceElem, Param, Signature, TypeExpr};

/// A type expression that cannot be printed as Go source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A name that is not a Go identifier or `pkg.Name` selector.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
    /// An instantiation with no type arguments.
    #[error("type instantiation without type arguments")]
    EmptyTypeArguments,
}

/// Renders `ty` as it would appear at the top level of a file.
///
/// # Errors
///
/// Fails when the tree holds a name that is not a Go identifier or an
/// instantiation without arguments.
pub fn render_type(ty: &TypeExpr) -> Result<String, RenderError> {
    render_type_at(ty, 0)
}

/// Renders `ty` nested `indent` levels deep. Only lines after the first
/// carry indentation.
///
/// # Errors
///
/// See [`render_type`].
pub fn render_type_at(ty: &TypeExpr, indent: usize) -> Result<String, RenderError> {
    let mut out = String::new();
    write_type(&mut out, ty, indent)?;
    Ok(out)
}

fn check_ident(name: &str) -> Result<(), RenderError> {
    let valid = match name.split_once('.') {
        Some((pkg, sel)) => is_identifier(pkg) && is_identifier(sel),
        None => is_identifier(name),
    };
    if valid {
        Ok(())
    } else {
        Err(RenderError::InvalidIdentifier(name.to_string()))
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n('\t', indent));
}

fn pad(out: &mut String, written: usize, width: usize) {
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(written)));
}

fn write_type(out: &mut String, ty: &TypeExpr, indent: usize) -> Result<(), RenderError> {
    match ty {
        TypeExpr::Ident(name) => {
            check_ident(name)?;
            out.push_str(name);
        }
        TypeExpr::Instance { base, args } => {
            if args.is_empty() {
                return Err(RenderError::EmptyTypeArguments);
            }
            write_type(out, base, indent)?;
            out.push('[');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_type(out, arg, indent)?;
            }
            out.push(']');
        }
        TypeExpr::Pointer(inner) => {
            out.push('*');
            write_type(out, inner, indent)?;
        }
        TypeExpr::Sequence { len, elem } => {
            out.push('[');
            if let Some(len) = len {
                out.push_str(len);
            }
            out.push(']');
            write_type(out, elem, indent)?;
        }
        TypeExpr::Map { key, value } => {
            out.push_str("map[");
            write_type(out, key, indent)?;
            out.push(']');
            write_type(out, value, indent)?;
        }
        TypeExpr::Chan { dir, elem } => {
            out.push_str(match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            });
            write_type(out, elem, indent)?;
        }
        TypeExpr::Func(sig) => {
            out.push_str("func");
            write_signature(out, sig, indent)?;
        }
        TypeExpr::Struct(fields) => write_struct(out, fields, indent)?,
        TypeExpr::Interface(elems) => write_interface(out, elems, indent)?,
        TypeExpr::Paren(inner) => {
            out.push('(');
            write_type(out, inner, indent)?;
            out.push(')');
        }
    }
    Ok(())
}

fn write_signature(out: &mut String, sig: &Signature, indent: usize) -> Result<(), RenderError> {
    write_params(out, &sig.params, indent)?;
    match sig.results.as_slice() {
        [] => {}
        [single] if single.names.is_empty() && !single.variadic => {
            out.push(' ');
            write_type(out, &single.ty, indent)?;
        }
        results => {
            out.push(' ');
            write_params(out, results, indent)?;
        }
    }
    Ok(())
}

fn write_params(out: &mut String, params: &[Param], indent: usize) -> Result<(), RenderError> {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if !param.names.is_empty() {
            for name in &param.names {
                check_ident(name)?;
            }
            out.push_str(&param.names.join(", "));
            out.push(' ');
        }
        if param.variadic {
            out.push_str("...");
        }
        write_type(out, &param.ty, indent)?;
    }
    out.push(')');
    Ok(())
}

fn write_interface(
    out: &mut String,
    elems: &[InterfaceElem],
    indent: usize,
) -> Result<(), RenderError> {
    if elems.is_empty() {
        out.push_str("interface{}");
        return Ok(());
    }
    out.push_str("interface {\n");
    for elem in elems {
        push_indent(out, indent + 1);
        match elem {
            InterfaceElem::Method { name, sig } => {
                check_ident(name)?;
                out.push_str(name);
                write_signature(out, sig, indent + 1)?;
            }
            InterfaceElem::Union(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    if term.tilde {
                        out.push('~');
                    }
                    write_type(out, &term.ty, indent + 1)?;
                }
            }
        }
        out.push('\n');
    }
    push_indent(out, indent);
    out.push('}');
    Ok(())
}

/// One struct field, its cells already rendered.
struct Row {
    names: Option<String>,
    ty: String,
    tag: Option<String>,
}

impl Row {
    fn new(field: &Field, indent: usize) -> Result<Self, RenderError> {
        let names = if field.is_embedded() {
            None
        } else {
            for name in &field.names {
                check_ident(&name.name)?;
            }
            Some(field.names.iter().map(|name| name.name.as_str()).join(", "))
        };
        Ok(Self {
            names,
            ty: render_type_at(&field.ty, indent)?,
            tag: field.tag.clone(),
        })
    }

    fn is_multiline(&self) -> bool {
        self.ty.contains('\n')
    }

    fn aligns_tag(&self) -> bool {
        self.tag.is_some() && !self.is_multiline()
    }
}

fn write_struct(out: &mut String, fields: &[Field], indent: usize) -> Result<(), RenderError> {
    if fields.is_empty() {
        out.push_str("struct{}");
        return Ok(());
    }
    let rows = fields
        .iter()
        .map(|field| Row::new(field, indent + 1))
        .collect::<Result<Vec<_>, _>>()?;

    out.push_str("struct {\n");
    for section in sections(&rows) {
        write_section(out, section, indent + 1);
    }
    push_indent(out, indent);
    out.push('}');
    Ok(())
}

/// Splits rows into runs that share column alignment.
fn sections(rows: &[Row]) -> Vec<&[Row]> {
    let mut sections = Vec::new();
    let mut start = 0;
    for (i, row) in rows.iter().enumerate() {
        if row.names.is_none() {
            if start < i {
                sections.push(&rows[start..i]);
            }
            sections.push(&rows[i..=i]);
            start = i + 1;
        } else if row.is_multiline() {
            sections.push(&rows[start..=i]);
            start = i + 1;
        }
    }
    if start < rows.len() {
        sections.push(&rows[start..]);
    }
    sections
}

fn write_section(out: &mut String, rows: &[Row], indent: usize) {
    let name_width = rows
        .iter()
        .filter_map(|row| row.names.as_ref().map(String::len))
        .max()
        .unwrap_or(0);

    // Tags align across consecutive tagged single-line rows.
    let mut type_widths = vec![0; rows.len()];
    let mut i = 0;
    while i < rows.len() {
        if !rows[i].aligns_tag() {
            i += 1;
            continue;
        }
        let end = rows[i..]
            .iter()
            .position(|row| !row.aligns_tag())
            .map_or(rows.len(), |n| i + n);
        let width = rows[i..end].iter().map(|row| row.ty.len()).max().unwrap_or(0);
        type_widths[i..end].fill(width);
        i = end;
    }

    for (row, type_width) in rows.iter().zip(type_widths) {
        push_indent(out, indent);
        if let Some(names) = &row.names {
            out.push_str(names);
            pad(out, names.len(), name_width);
            out.push(' ');
        }
        out.push_str(&row.ty);
        if let Some(tag) = &row.tag {
            pad(out, row.ty.len(), type_width);
            out.push(' ');
            out.push_str(tag);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::parse_type_expr;

    fn roundtrip(src: &str) -> String {
        let ty = parse_type_expr(src).unwrap_or_else(|diags| panic!("{diags}"));
        render_type(&ty).unwrap()
    }

    #[rstest]
    #[case("string", "string")]
    #[case("*ast.Node", "*ast.Node")]
    #[case("map[string] []*Node", "map[string][]*Node")]
    #[case("[ 4 ]byte", "[4]byte")]
    #[case("func(a,b int, rest ...string)(n int, err error)", "func(a, b int, rest ...string) (n int, err error)")]
    #[case("func(int) error", "func(int) error")]
    #[case("func()", "func()")]
    #[case("<-chan  int", "<-chan int")]
    #[case("chan<- int", "chan<- int")]
    #[case("List[ int,string ]", "List[int, string]")]
    #[case("struct{}", "struct{}")]
    #[case("interface{}", "interface{}")]
    fn test_render_single_line(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(roundtrip(src), expected);
    }

    #[test]
    fn test_render_aligned_struct() {
        let rendered = roundtrip("struct {\nLeft Node\nRightmost Node\n}");
        assert_eq!(rendered, "struct {\n\tLeft      Node\n\tRightmost Node\n}");
    }

    #[test]
    fn test_multiline_field_closes_section() {
        let rendered = roundtrip("struct {\nA int\nOperatorSum struct {\nX int\n}\nE string\n}");
        assert_eq!(
            rendered,
            "struct {\n\tA           int\n\tOperatorSum struct {\n\t\tX int\n\t}\n\tE string\n}"
        );
    }

    #[test]
    fn test_embedded_field_breaks_alignment() {
        let rendered = roundtrip("struct {\nLong int\nio.Reader\nA int\n}");
        assert_eq!(rendered, "struct {\n\tLong int\n\tio.Reader\n\tA int\n}");
    }

    #[test]
    fn test_tags_align_in_consecutive_rows() {
        let rendered = roundtrip("struct {\nID int `json:\"id\"`\nName string `json:\"name\"`\nRaw []byte\n}");
        assert_eq!(
            rendered,
            "struct {\n\tID   int    `json:\"id\"`\n\tName string `json:\"name\"`\n\tRaw  []byte\n}"
        );
    }

    #[test]
    fn test_render_interface_body() {
        let rendered = roundtrip("interface{ isNode(); ~int | ~string }");
        assert_eq!(rendered, "interface {\n\tisNode()\n\t~int | ~string\n}");
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let ty = TypeExpr::slice(TypeExpr::ident("not valid"));
        assert_eq!(
            render_type(&ty),
            Err(RenderError::InvalidIdentifier("not valid".into()))
        );
    }

    #[test]
    fn test_empty_instance_rejected() {
        let ty = TypeExpr::Instance {
            base: Box::new(TypeExpr::ident("List")),
            args: Vec::new(),
        };
        assert_eq!(render_type(&ty), Err(RenderError::EmptyTypeArguments));
    }
}
