//! Go front end over the tree-sitter Go grammar.
//!
//! tree-sitter parses the whole buffer and recovers from syntax errors by
//! itself. This module reports every `ERROR` and missing node of the
//! resulting tree, checks the file-level rules tree-sitter does not enforce
//! (package clause first, imports before declarations, no statements at the
//! top level) and lowers the package clause, imports and type declarations
//! into a [`SourceUnit`].
//!
//! Types are only lowered once the tree is free of errors, so a broken file
//! is reported once per problem and never half-lowered.

use oneof_common::{Diagnostic, Diagnostics, Location, Position};
use tree_sitter::{Node, Tree};

use super::ast::{
    ChanDir, Field, Ident, ImportSpec, InterfaceElem, Param, Signature, SourceUnit, Term,
    TypeExpr, TypeSpec,
};

/// Go accepts and ignores a byte order mark at the start of a file.
const BOM: char = '\u{feff}';

/// Text put in front of a lone type so that it parses as a file.
const TYPE_PREFIX: &str = "package p\n\ntype T = ";
/// Line and 0-based column at which a lone type starts inside the wrapper.
const TYPE_LINE: usize = 3;
const TYPE_COLUMN: usize = 9;

type LResult<T> = Result<T, Diagnostic>;

/// Parses a whole Go file.
///
/// # Errors
///
/// Returns every syntax error found, ordered by position.
pub fn parse_file(file: &str, src: &str) -> Result<SourceUnit, Diagnostics> {
    let src = src.strip_prefix(BOM).unwrap_or(src);
    let tree = parse_tree(file, src)?;

    let mut lowerer = Lowerer {
        file,
        src,
        diagnostics: Diagnostics::new(),
    };
    let unit = lowerer.lower_file(tree.root_node());

    let mut diagnostics = lowerer.diagnostics;
    diagnostics.sort();
    match unit {
        Some(unit) => {
            tracing::debug!(
                file,
                imports = unit.imports.len(),
                types = unit.types.len(),
                "parsed source unit"
            );
            diagnostics.into_result(unit)
        }
        None => Err(diagnostics),
    }
}

/// Parses `src` as a single type expression.
///
/// # Errors
///
/// Returns every syntax error, positioned relative to `src`.
pub fn parse_type(src: &str) -> Result<TypeExpr, Diagnostics> {
    let wrapped = format!("{TYPE_PREFIX}{src}\n");
    let unit = parse_file("<type>", &wrapped).map_err(|diagnostics| {
        diagnostics
            .into_iter()
            .map(unwrap_type_location)
            .collect::<Diagnostics>()
    })?;

    let mut types = unit.types.into_iter();
    match (types.next(), types.next()) {
        (Some(spec), None) => Ok(spec.ty),
        _ => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.error(Location::line("<type>", 1), "expected a single type");
            Err(diagnostics)
        }
    }
}

/// Moves a diagnostic from the wrapper file back onto the lone type.
fn unwrap_type_location(diagnostic: Diagnostic) -> Diagnostic {
    let mut location = diagnostic.location;
    if location.line == TYPE_LINE {
        location.column = location
            .column
            .map(|column| column.saturating_sub(TYPE_COLUMN).max(1));
    }
    location.line = location.line.saturating_sub(TYPE_LINE - 1).max(1);
    Diagnostic::new(location, diagnostic.message)
}

fn parse_tree(file: &str, src: &str) -> Result<Tree, Diagnostics> {
    let failed = |message: String| {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(Location::line(file, 1), message);
        diagnostics
    };

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| failed(format!("loading the Go grammar: {e}")))?;
    parser
        .parse(src, None)
        .ok_or_else(|| failed("the Go parser returned no tree".to_string()))
}

/// Named children of `node`, comments left out.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Every child stored under the field `name`, in source order.
fn field_nodes<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

/// Kind of the first token of `node`, e.g. `type` for a type declaration.
fn first_token_kind(node: Node<'_>) -> &'static str {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .next()
        .map_or_else(|| node.kind(), |child| child.kind())
}

/// Human name of a grammar symbol, quoted when it is punctuation.
fn describe_kind(kind: &str) -> String {
    match kind {
        "\n" => "newline".to_string(),
        _ if kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_') => kind.replace('_', " "),
        _ => format!("'{kind}'"),
    }
}

fn position(node: Node<'_>) -> Position {
    let point = node.start_position();
    Position::new(node.start_byte(), point.row + 1, point.column + 1)
}

struct Lowerer<'src> {
    file: &'src str,
    src: &'src str,
    diagnostics: Diagnostics,
}

impl<'src> Lowerer<'src> {
    fn text(&self, node: Node<'_>) -> &'src str {
        self.src.get(node.byte_range()).unwrap_or_default()
    }

    fn error(&self, node: Node<'_>, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(Location::new(self.file, position(node)), message)
    }

    fn report(&mut self, node: Node<'_>, message: impl Into<String>) {
        let diagnostic = self.error(node, message);
        self.diagnostics.push(diagnostic);
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> LResult<Node<'t>> {
        node.child_by_field_name(name).ok_or_else(|| {
            self.error(node, format!("expected {name} in {}", describe_kind(node.kind())))
        })
    }

    fn only_child<'t>(&self, node: Node<'t>) -> LResult<Node<'t>> {
        named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| self.error(node, format!("empty {}", describe_kind(node.kind()))))
    }

    fn ident(&self, node: Node<'_>) -> Ident {
        Ident::new(self.text(node), position(node))
    }

    /// Records every error and missing node at or below `node`.
    fn collect_syntax_errors(&mut self, node: Node<'_>) {
        if !node.has_error() {
            return;
        }
        if node.is_missing() {
            self.report(node, format!("expected {}", describe_kind(node.kind())));
            return;
        }
        if node.is_error() {
            let found = self
                .text(node)
                .split_whitespace()
                .next()
                .map_or_else(|| "EOF".to_string(), |token| format!("{token:?}"));
            self.report(node, format!("syntax error: unexpected {found}"));
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_syntax_errors(child);
        }
    }

    fn lower_file(&mut self, root: Node<'_>) -> Option<SourceUnit> {
        self.collect_syntax_errors(root);

        let mut decls = named_children(root).into_iter();
        let package = match decls.next() {
            Some(node) if node.kind() == "package_clause" => node,
            Some(node) => {
                if !node.is_error() {
                    let found = describe_kind(first_token_kind(node));
                    self.report(node, format!("expected 'package', found {found}"));
                }
                return None;
            }
            None => {
                let end = root.end_position();
                let location = Location::new(
                    self.file,
                    Position::new(root.end_byte(), end.row + 1, end.column + 1),
                );
                self.diagnostics
                    .push(Diagnostic::new(location, "expected 'package', found EOF"));
                return None;
            }
        };

        let mut import_decls = Vec::new();
        let mut type_decls = Vec::new();
        let mut imports_closed = false;
        for node in decls {
            match node.kind() {
                "import_declaration" if imports_closed => {
                    self.report(node, "imports must appear before other declarations");
                }
                "import_declaration" => import_decls.push(node),
                "type_declaration" => {
                    imports_closed = true;
                    type_decls.push(node);
                }
                "function_declaration" | "method_declaration" | "var_declaration"
                | "const_declaration" => imports_closed = true,
                "package_clause" => {
                    imports_closed = true;
                    self.report(node, "expected declaration, found 'package'");
                }
                _ if node.is_error() => imports_closed = true,
                _ => {
                    imports_closed = true;
                    self.report(node, "non-declaration statement outside function body");
                }
            }
        }
        if !self.diagnostics.is_empty() {
            return None;
        }

        let name = match self.only_child(package) {
            Ok(name) => self.ident(name),
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                return None;
            }
        };

        let leading = self.src.get(..package.start_byte()).unwrap_or_default();
        let header = (!leading.trim().is_empty())
            .then(|| leading.trim_start().trim_end_matches([' ', '\t']).to_string());

        let mut imports = Vec::new();
        for decl in import_decls {
            match self.lower_import_decl(decl) {
                Ok(specs) => imports.extend(specs),
                Err(diagnostic) => self.diagnostics.push(diagnostic),
            }
        }

        let mut types = Vec::new();
        for decl in type_decls {
            for spec in named_children(decl) {
                match self.lower_type_spec(spec) {
                    Ok(spec) => types.push(spec),
                    Err(diagnostic) => self.diagnostics.push(diagnostic),
                }
            }
        }

        Some(SourceUnit {
            file: self.file.to_string(),
            header,
            package: name,
            imports,
            types,
        })
    }

    fn lower_import_decl(&self, decl: Node<'_>) -> LResult<Vec<ImportSpec>> {
        let mut specs = Vec::new();
        for child in named_children(decl) {
            match child.kind() {
                "import_spec" => specs.push(self.lower_import_spec(child)?),
                "import_spec_list" => {
                    for spec in named_children(child) {
                        specs.push(self.lower_import_spec(spec)?);
                    }
                }
                kind => return Err(self.error(child, format!("unexpected {}", describe_kind(kind)))),
            }
        }
        Ok(specs)
    }

    fn lower_import_spec(&self, spec: Node<'_>) -> LResult<ImportSpec> {
        Ok(ImportSpec {
            alias: spec
                .child_by_field_name("name")
                .map(|name| self.text(name).to_string()),
            path: self.text(self.field(spec, "path")?).to_string(),
            pos: position(spec),
        })
    }

    fn lower_type_spec(&self, spec: Node<'_>) -> LResult<TypeSpec> {
        let alias = match spec.kind() {
            "type_spec" => false,
            "type_alias" => true,
            kind => return Err(self.error(spec, format!("unexpected {}", describe_kind(kind)))),
        };
        Ok(TypeSpec {
            name: self.ident(self.field(spec, "name")?),
            type_params: spec
                .child_by_field_name("type_parameters")
                .map(|params| self.text(params).to_string()),
            alias,
            ty: self.lower_type(self.field(spec, "type")?)?,
            text: self.text(spec).to_string(),
        })
    }

    fn lower_type(&self, node: Node<'_>) -> LResult<TypeExpr> {
        match node.kind() {
            "type_identifier" => Ok(TypeExpr::ident(self.text(node))),
            "qualified_type" => {
                let package = self.text(self.field(node, "package")?);
                let name = self.text(self.field(node, "name")?);
                Ok(TypeExpr::ident(format!("{package}.{name}")))
            }
            "generic_type" => {
                let base = self.lower_type(self.field(node, "type")?)?;
                let args = named_children(self.field(node, "type_arguments")?)
                    .into_iter()
                    .map(|arg| self.lower_type_arg(arg))
                    .collect::<LResult<Vec<_>>>()?;
                Ok(TypeExpr::Instance {
                    base: Box::new(base),
                    args,
                })
            }
            "pointer_type" => Ok(TypeExpr::pointer(self.lower_type(self.only_child(node)?)?)),
            "slice_type" => Ok(TypeExpr::slice(self.lower_type(self.field(node, "element")?)?)),
            "array_type" => Ok(TypeExpr::Sequence {
                len: Some(self.text(self.field(node, "length")?).to_string()),
                elem: Box::new(self.lower_type(self.field(node, "element")?)?),
            }),
            "implicit_length_array_type" => Ok(TypeExpr::Sequence {
                len: Some("...".to_string()),
                elem: Box::new(self.lower_type(self.field(node, "element")?)?),
            }),
            "map_type" => Ok(TypeExpr::map(
                self.lower_type(self.field(node, "key")?)?,
                self.lower_type(self.field(node, "value")?)?,
            )),
            "channel_type" => {
                let mut cursor = node.walk();
                let tokens: Vec<_> = node.children(&mut cursor).take(2).map(|c| c.kind()).collect();
                let dir = match tokens.as_slice() {
                    ["<-", ..] => ChanDir::Recv,
                    ["chan", "<-"] => ChanDir::Send,
                    _ => ChanDir::Both,
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.lower_type(self.field(node, "value")?)?),
                })
            }
            "function_type" => Ok(TypeExpr::Func(self.lower_signature(node)?)),
            "struct_type" => {
                let fields = named_children(self.only_child(node)?)
                    .into_iter()
                    .map(|decl| self.lower_field(decl))
                    .collect::<LResult<_>>()?;
                Ok(TypeExpr::Struct(fields))
            }
            "interface_type" => {
                let elems = named_children(node)
                    .into_iter()
                    .map(|elem| self.lower_interface_elem(elem))
                    .collect::<LResult<_>>()?;
                Ok(TypeExpr::Interface(elems))
            }
            "parenthesized_type" => Ok(TypeExpr::Paren(Box::new(
                self.lower_type(self.only_child(node)?)?,
            ))),
            kind => Err(self.error(node, format!("unexpected {} in type", describe_kind(kind)))),
        }
    }

    /// A type argument. Unions are only meaningful in constraints.
    fn lower_type_arg(&self, arg: Node<'_>) -> LResult<TypeExpr> {
        if arg.kind() != "type_elem" {
            return self.lower_type(arg);
        }
        match named_children(arg).as_slice() {
            [single] => self.lower_type(*single),
            _ => Err(self.error(arg, "union types are not allowed as type arguments")),
        }
    }

    fn lower_field(&self, decl: Node<'_>) -> LResult<Field> {
        let names: Vec<_> = field_nodes(decl, "name")
            .into_iter()
            .map(|name| self.ident(name))
            .collect();
        let mut ty = self.lower_type(self.field(decl, "type")?)?;
        // An embedded `*T` keeps its star outside the type node.
        if names.is_empty() && self.text(decl).starts_with('*') {
            ty = TypeExpr::pointer(ty);
        }
        Ok(Field {
            names,
            ty,
            tag: decl
                .child_by_field_name("tag")
                .map(|tag| self.text(tag).to_string()),
            pos: position(decl),
        })
    }

    fn lower_interface_elem(&self, elem: Node<'_>) -> LResult<InterfaceElem> {
        match elem.kind() {
            "method_elem" => Ok(InterfaceElem::Method {
                name: self.text(self.field(elem, "name")?).to_string(),
                sig: self.lower_signature(elem)?,
            }),
            "type_elem" => {
                let terms = named_children(elem)
                    .into_iter()
                    .map(|term| self.lower_term(term))
                    .collect::<LResult<_>>()?;
                Ok(InterfaceElem::Union(terms))
            }
            kind => Err(self.error(elem, format!("unexpected {} in interface", describe_kind(kind)))),
        }
    }

    fn lower_term(&self, term: Node<'_>) -> LResult<Term> {
        if term.kind() == "negated_type" {
            Ok(Term {
                tilde: true,
                ty: self.lower_type(self.only_child(term)?)?,
            })
        } else {
            Ok(Term {
                tilde: false,
                ty: self.lower_type(term)?,
            })
        }
    }

    /// Parameters and results of a function type or interface method.
    fn lower_signature(&self, node: Node<'_>) -> LResult<Signature> {
        let params = self.lower_params(self.field(node, "parameters")?)?;
        let results = match node.child_by_field_name("result") {
            None => Vec::new(),
            Some(result) if result.kind() == "parameter_list" => self.lower_params(result)?,
            Some(result) => vec![Param::unnamed(self.lower_type(result)?)],
        };
        Ok(Signature { params, results })
    }

    fn lower_params(&self, list: Node<'_>) -> LResult<Vec<Param>> {
        let params = named_children(list)
            .into_iter()
            .map(|decl| {
                Ok(Param {
                    names: field_nodes(decl, "name")
                        .into_iter()
                        .map(|name| self.text(name).to_string())
                        .collect(),
                    ty: self.lower_type(self.field(decl, "type")?)?,
                    variadic: decl.kind() == "variadic_parameter_declaration",
                })
            })
            .collect::<LResult<Vec<_>>>()?;

        let named = params.iter().filter(|param| !param.names.is_empty()).count();
        if named > 0 && named < params.len() {
            return Err(self.error(list, "mixed named and unnamed parameters"));
        }
        Ok(params)
    }
}
