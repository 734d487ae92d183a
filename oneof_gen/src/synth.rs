//! Builds the interface, branch types and marker methods of a union.
//!
//! Artifacts are plain values. They only become text in
//! [`Artifacts::render`], right before assembly.

use std::fmt;

use contracts::*;
use oneof_common::Location;
use oneof_syntax::{TypeExpr, render_type};

use crate::OneofError;
use crate::locate::Marker;
use crate::rewrite::{count_references, rewrite};

/// How a branch type implements the marker method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receiver {
    /// `func (X) isNode() {}`
    Value,
    /// `func (*X) isNode() {}`
    Pointer,
}

impl Receiver {
    /// Struct branches get pointer receivers, everything else value ones.
    pub fn for_type(ty: &TypeExpr) -> Self {
        if ty.is_struct() {
            Self::Pointer
        } else {
            Self::Value
        }
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => Ok(()),
            Self::Pointer => write!(f, "*"),
        }
    }
}

/// The capability interface, `type Node interface { isNode() }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceSpec {
    /// Interface name, the variant.
    pub name: String,
    /// Marker method name, `is` plus the variant.
    pub method: String,
}

impl InterfaceSpec {
    /// The interface of `variant`.
    #[requires(!variant.is_empty())]
    pub fn new(variant: &str) -> Self {
        Self {
            name: variant.to_string(),
            method: format!("is{variant}"),
        }
    }
}

/// A branch type and the receiver of its marker method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchSpec {
    /// Name of the generated type.
    pub name: String,
    /// Branch type with self-references already rewritten.
    pub ty: TypeExpr,
    /// Receiver of the marker method.
    pub receiver: Receiver,
    /// Marker field the branch came from.
    pub location: Location,
}

/// Everything generated for one union, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    /// The capability interface.
    pub interface: InterfaceSpec,
    /// One entry per branch, in declaration order.
    pub branches: Vec<BranchSpec>,
}

/// Rewrites every branch of `marker` and derives its receiver.
pub fn synthesize(marker: &Marker) -> Artifacts {
    let branches = marker
        .branches
        .iter()
        .map(|branch| {
            let ty = rewrite(&branch.ty, &marker.name, &marker.variant);
            let remaining = count_references(&ty, &marker.name);
            if remaining > 0 {
                tracing::warn!(
                    branch = %branch.name,
                    location = %branch.location,
                    remaining,
                    "branch still refers to {} where it cannot be rewritten",
                    marker.name
                );
            }
            BranchSpec {
                name: branch.name.clone(),
                receiver: Receiver::for_type(&ty),
                ty,
                location: branch.location.clone(),
            }
        })
        .collect();

    Artifacts {
        interface: InterfaceSpec::new(&marker.variant),
        branches,
    }
}

impl Artifacts {
    /// Renders the artifacts as Go declarations, each followed by a blank
    /// line.
    ///
    /// # Errors
    ///
    /// Fails with the name of the first branch whose type cannot be
    /// printed.
    pub fn render(&self) -> Result<String, OneofError> {
        let InterfaceSpec { name, method } = &self.interface;
        let mut out = format!(
            "// {name} an interface to limit available implementations to emulate discriminated union type\n\
             type {name} interface {{\n\t{method}()\n}}\n\n"
        );

        for branch in &self.branches {
            let ty = render_type(&branch.ty).map_err(|source| OneofError::Render {
                location: branch.location.clone(),
                branch: branch.name.clone(),
                source,
            })?;
            out.push_str(&format!(
                "// {branch} branch of {name}\ntype {branch} {ty}\n\nfunc ({receiver}{branch}) {method}() {{}}\n\n",
                branch = branch.name,
                receiver = branch.receiver,
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use oneof_common::Config;
    use oneof_syntax::{RenderError, parse_source};

    use super::*;
    use crate::locate::locate;

    fn artifacts(src: &str) -> Artifacts {
        let unit = parse_source("node.go", src).unwrap();
        synthesize(&locate(&unit, &Config::default()).unwrap())
    }

    #[test]
    fn test_structure_of_artifacts() {
        let artifacts = artifacts(
            "package node\n\ntype oneofNode struct {\n\tValue string\n\tOperatorSum struct {\n\t\tLeft *oneofNode\n\t\tRight *oneofNode\n\t}\n\tList []*oneofNode\n}\n",
        );

        assert_eq!(artifacts.interface, InterfaceSpec::new("Node"));
        assert_eq!(artifacts.interface.method, "isNode");

        let receivers: Vec<_> = artifacts
            .branches
            .iter()
            .map(|b| (b.name.as_str(), b.receiver))
            .collect();
        assert_eq!(
            receivers,
            vec![
                ("Value", Receiver::Value),
                ("OperatorSum", Receiver::Pointer),
                ("List", Receiver::Value),
            ]
        );
        assert_eq!(
            artifacts.branches[2].ty,
            TypeExpr::slice(TypeExpr::ident("Node"))
        );
        for branch in &artifacts.branches {
            assert_eq!(count_references(&branch.ty, "oneofNode"), 0);
        }
    }

    #[test]
    fn test_render_text() {
        let artifacts = artifacts("package node\n\ntype oneofNode struct {\n\tValue string\n}\n");
        assert_eq!(
            artifacts.render().unwrap(),
            "// Node an interface to limit available implementations to emulate discriminated union type\n\
             type Node interface {\n\tisNode()\n}\n\n\
             // Value branch of Node\ntype Value string\n\nfunc (Value) isNode() {}\n\n"
        );
    }

    #[test]
    fn test_render_error_names_branch() {
        let artifacts = Artifacts {
            interface: InterfaceSpec::new("Node"),
            branches: vec![BranchSpec {
                name: "Broken".into(),
                ty: TypeExpr::ident("1abc"),
                receiver: Receiver::Value,
                location: Location::line("node.go", 4),
            }],
        };
        let err = artifacts.render().unwrap_err();
        assert!(matches!(
            &err,
            OneofError::Render { branch, source: RenderError::InvalidIdentifier(_), .. } if branch == "Broken"
        ));
        assert_eq!(
            err.to_string(),
            "node.go:4: rendering branch for field Broken: invalid identifier \"1abc\""
        );
    }
}
