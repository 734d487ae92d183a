//! Finds the marker struct of a file and validates its branches.

use std::collections::HashMap;

use oneof_common::casing::{is_public, public_name};
use oneof_common::{Config, Diagnostics, Location};
use oneof_syntax::{Field, SourceUnit, TypeExpr, TypeSpec};

use crate::OneofError;

/// One case of the union, taken from a marker field.
///
/// `A, B T` in the marker yields two branches of the same type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    /// Field name, which becomes the name of the branch type.
    pub name: String,
    /// Field type as written, self-references included.
    pub ty: TypeExpr,
    /// Where the field name was written.
    pub location: Location,
}

/// The validated marker declaration.
#[derive(Clone, Debug)]
pub struct Marker {
    /// Full type name, `oneofNode`.
    pub name: String,
    /// Name with the prefix stripped, `Node`.
    pub variant: String,
    /// Branches in declaration order.
    pub branches: Vec<Branch>,
    /// Source text of the type spec, kept verbatim in the output.
    pub text: String,
}

impl Marker {
    /// Name of the method every branch implements, `isNode`.
    pub fn method(&self) -> String {
        format!("is{}", self.variant)
    }
}

fn marker_fields<'u>(spec: &'u TypeSpec, prefix: &str) -> Option<&'u [Field]> {
    match &spec.ty {
        TypeExpr::Struct(fields) if spec.name.name.starts_with(prefix) => Some(fields),
        _ => None,
    }
}

/// Locates the single marker struct of `unit`.
///
/// # Errors
///
/// Fails when no marker or more than one exists, when the marker's name or
/// type parameters are invalid, and with every branch problem at once when
/// any field is unusable.
pub fn locate(unit: &SourceUnit, config: &Config) -> Result<Marker, OneofError> {
    let mut candidates = unit
        .types
        .iter()
        .filter_map(|spec| marker_fields(spec, &config.prefix).map(|fields| (spec, fields)));

    let Some((spec, fields)) = candidates.next() else {
        return Err(OneofError::NoCandidate(Location::line(unit.file.clone(), 1)));
    };
    let location = unit.location(spec.name.pos);
    let variant = &spec.name.name[config.prefix.len()..];

    if !is_public(variant) {
        let expected = if variant.is_empty() {
            format!("{}<Name>", config.prefix)
        } else {
            config.marker_name(&public_name(variant))
        };
        return Err(OneofError::VariantName {
            location,
            expected,
            actual: spec.name.name.clone(),
        });
    }
    if spec.type_params.is_some() {
        return Err(OneofError::TypeParameters(location));
    }

    let branches = collect_branches(unit, variant, fields).map_err(OneofError::Branches)?;

    if let Some((duplicate, _)) = candidates.next() {
        return Err(OneofError::Duplicate {
            location: unit.location(duplicate.name.pos),
            previous: spec.name.name.clone(),
            previous_location: location,
        });
    }

    if branches.is_empty() {
        tracing::warn!(marker = %spec.name.name, "oneof has no branches");
    }
    tracing::debug!(
        marker = %spec.name.name,
        branches = branches.len(),
        "located oneof"
    );

    Ok(Marker {
        name: spec.name.name.clone(),
        variant: variant.to_string(),
        branches,
        text: spec.text.clone(),
    })
}

/// Turns marker fields into branches, collecting every problem found.
fn collect_branches(
    unit: &SourceUnit,
    variant: &str,
    fields: &[Field],
) -> Result<Vec<Branch>, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let mut seen: HashMap<&str, Location> = HashMap::new();
    let mut branches = Vec::new();

    for field in fields {
        if field.is_embedded() {
            diagnostics.error(
                unit.location(field.pos),
                "embedding is not allowed for oneofs",
            );
            continue;
        }
        for ident in &field.names {
            let location = unit.location(ident.pos);
            let name = ident.name.as_str();

            let expected = public_name(name);
            if expected != name {
                diagnostics.error(
                    location.clone(),
                    format!("invalid branch name {name} for oneof branch, must be {expected}"),
                );
            }
            if name == variant {
                diagnostics.error(
                    location.clone(),
                    format!("branch {name} has the same name as the oneof interface"),
                );
            }
            match seen.get(name) {
                Some(previous) => diagnostics.error(
                    location.clone(),
                    format!("duplicate branch {name}, the previous one is at {previous}"),
                ),
                None => {
                    seen.insert(name, location.clone());
                }
            }

            branches.push(Branch {
                name: name.to_string(),
                ty: field.ty.clone(),
                location,
            });
        }
    }

    diagnostics.into_result(branches)
}
