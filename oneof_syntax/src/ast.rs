//! Syntax tree for the parts of a Go file the generator reads.
//!
//! Only the package clause, imports and type declarations are kept. Other
//! top-level declarations are recognised by the parser and skipped.

use oneof_common::{Location, Position};

/// An identifier together with where it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    /// The identifier text.
    pub name: String,
    /// Position of its first byte.
    pub pos: Position,
}

impl Ident {
    /// An identifier named `name` written at `pos`.
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

/// A parsed Go source file.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    /// File name used in diagnostics.
    pub file: String,
    /// Comments preceding the package clause, verbatim up to and including
    /// the line break before `package`.
    pub header: Option<String>,
    /// Package name from the package clause.
    pub package: Ident,
    /// Every import spec, grouped or not, in source order.
    pub imports: Vec<ImportSpec>,
    /// Every top-level type spec, grouped or not, in source order.
    pub types: Vec<TypeSpec>,
}

impl SourceUnit {
    /// `pos` qualified with the file name of this unit.
    pub fn location(&self, pos: Position) -> Location {
        Location::new(self.file.clone(), pos)
    }
}

/// One import entry, `alias "path"` or `"path"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local name, `.` or `_` included.
    pub alias: Option<String>,
    /// Quoted path literal as written.
    pub path: String,
    /// Start of the spec.
    pub pos: Position,
}

impl ImportSpec {
    /// The import as written inside an import block.
    pub fn to_source(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias} {}", self.path),
            None => self.path.clone(),
        }
    }
}

/// A top-level `type` spec.
#[derive(Clone, Debug)]
pub struct TypeSpec {
    /// Declared type name.
    pub name: Ident,
    /// Type parameter list as written, brackets included.
    pub type_params: Option<String>,
    /// `type A = B`.
    pub alias: bool,
    /// The declared type, or the aliased one.
    pub ty: TypeExpr,
    /// Source text from the name through the end of the type.
    pub text: String,
}

/// Channel direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A Go type expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    /// Type name, possibly package qualified (`ast.Node`).
    Ident(String),
    /// Generic instantiation, `List[int]`.
    Instance {
        /// The generic type being instantiated.
        base: Box<TypeExpr>,
        /// Type arguments, never empty in parsed source.
        args: Vec<TypeExpr>,
    },
    /// `*T`.
    Pointer(Box<TypeExpr>),
    /// Slice (`len` is `None`) or array, the length kept as written.
    Sequence {
        /// Array length expression, `None` for slices.
        len: Option<String>,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`.
    Map {
        /// Key type.
        key: Box<TypeExpr>,
        /// Value type.
        value: Box<TypeExpr>,
    },
    /// Channel of any direction.
    Chan {
        /// Which way values flow.
        dir: ChanDir,
        /// Element type.
        elem: Box<TypeExpr>,
    },
    /// `func(...) ...`.
    Func(Signature),
    /// Inline struct with its fields in order.
    Struct(Vec<Field>),
    /// Inline interface with its elements in order.
    Interface(Vec<InterfaceElem>),
    /// A type in parentheses, kept so it prints back the same.
    Paren(Box<TypeExpr>),
}

impl TypeExpr {
    /// A (possibly qualified) type name.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// `*inner`.
    pub fn pointer(inner: TypeExpr) -> Self {
        Self::Pointer(Box::new(inner))
    }

    /// `[]elem`.
    pub fn slice(elem: TypeExpr) -> Self {
        Self::Sequence {
            len: None,
            elem: Box::new(elem),
        }
    }

    /// `map[key]value`.
    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The name, when this is a plain type name.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the expression itself is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Visits this node and every nested type expression, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeExpr)) {
        visit(self);
        match self {
            Self::Ident(_) => {}
            Self::Instance { base, args } => {
                base.walk(visit);
                for arg in args {
                    arg.walk(visit);
                }
            }
            Self::Pointer(inner) | Self::Paren(inner) => inner.walk(visit),
            Self::Sequence { elem, .. } | Self::Chan { elem, .. } => elem.walk(visit),
            Self::Map { key, value } => {
                key.walk(visit);
                value.walk(visit);
            }
            Self::Func(sig) => sig.walk(visit),
            Self::Struct(fields) => {
                for field in fields {
                    field.ty.walk(visit);
                }
            }
            Self::Interface(elems) => {
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { sig, .. } => sig.walk(visit),
                        InterfaceElem::Union(terms) => {
                            for term in terms {
                                term.ty.walk(visit);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A struct field declaration. Embedded fields have no names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Declared names, `A, B T` giving two.
    pub names: Vec<Ident>,
    /// Field type, a pointer for an embedded `*T`.
    pub ty: TypeExpr,
    /// Tag literal as written.
    pub tag: Option<String>,
    /// Start of the declaration.
    pub pos: Position,
}

impl Field {
    /// Whether the field is embedded rather than named.
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parameters and results of a function type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    /// Parameter groups.
    pub params: Vec<Param>,
    /// Result groups, empty when the function returns nothing.
    pub results: Vec<Param>,
}

impl Signature {
    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeExpr)) {
        for param in self.params.iter().chain(&self.results) {
            param.ty.walk(visit);
        }
    }
}

/// A parameter group, `a, b int`, or a single unnamed type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    /// Parameter names, empty for an unnamed parameter.
    pub names: Vec<String>,
    /// Type shared by every name of the group.
    pub ty: TypeExpr,
    /// `...T`, only valid on the last parameter.
    pub variadic: bool,
}

impl Param {
    /// A parameter with a type and no name.
    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: Vec::new(),
            ty,
            variadic: false,
        }
    }
}

/// Interface element: a method or a (possibly single-term) type union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterfaceElem {
    /// `name(params) results`.
    Method {
        /// Method name.
        name: String,
        /// Method parameters and results.
        sig: Signature,
    },
    /// `A | ~B`, or an embedded interface as a single term.
    Union(Vec<Term>),
}

/// One term of a type union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    /// `~T`.
    pub tilde: bool,
    /// The term type.
    pub ty: TypeExpr,
}
