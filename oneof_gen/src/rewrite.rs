//! Replaces `*oneofX` self-references with the interface type.
//!
//! The rewrite builds a fresh tree and never touches its input, so branches
//! can be rewritten independently of one another.
//!
//! Only pointers to the marker are rewritten, and only where they can be
//! reached through pointers, slices, arrays, maps, function signatures,
//! inline structs and parentheses. Channels, interfaces and generic
//! instantiations are copied unchanged.

use contracts::*;
use oneof_syntax::{Field, Param, Signature, TypeExpr};

/// Rewrites every `*marker` inside `ty` to `variant`.
#[ensures(count_references(&ret, marker) <= count_references(ty, marker))]
pub fn rewrite(ty: &TypeExpr, marker: &str, variant: &str) -> TypeExpr {
    Rewriter { marker, variant }.fold(ty)
}

/// Number of identifiers in `ty` naming `marker`.
pub fn count_references(ty: &TypeExpr, marker: &str) -> usize {
    let mut count = 0;
    ty.walk(&mut |node| {
        if node.as_ident() == Some(marker) {
            count += 1;
        }
    });
    count
}

struct Rewriter<'a> {
    marker: &'a str,
    variant: &'a str,
}

impl Rewriter<'_> {
    fn fold(&self, ty: &TypeExpr) -> TypeExpr {
        match ty {
            TypeExpr::Pointer(inner) if inner.as_ident() == Some(self.marker) => {
                TypeExpr::ident(self.variant)
            }
            TypeExpr::Pointer(inner) => TypeExpr::pointer(self.fold(inner)),
            TypeExpr::Sequence { len, elem } => TypeExpr::Sequence {
                len: len.clone(),
                elem: Box::new(self.fold(elem)),
            },
            TypeExpr::Map { key, value } => TypeExpr::map(self.fold(key), self.fold(value)),
            TypeExpr::Func(sig) => TypeExpr::Func(self.fold_signature(sig)),
            TypeExpr::Struct(fields) => {
                TypeExpr::Struct(fields.iter().map(|field| self.fold_field(field)).collect())
            }
            TypeExpr::Paren(inner) => TypeExpr::Paren(Box::new(self.fold(inner))),
            TypeExpr::Ident(_)
            | TypeExpr::Chan { .. }
            | TypeExpr::Interface(_)
            | TypeExpr::Instance { .. } => ty.clone(),
        }
    }

    fn fold_field(&self, field: &Field) -> Field {
        Field {
            ty: self.fold(&field.ty),
            ..field.clone()
        }
    }

    fn fold_signature(&self, sig: &Signature) -> Signature {
        let fold_params = |params: &[Param]| -> Vec<Param> {
            params
                .iter()
                .map(|param| Param {
                    names: param.names.clone(),
                    ty: self.fold(&param.ty),
                    variadic: param.variadic,
                })
                .collect()
        };
        Signature {
            params: fold_params(&sig.params),
            results: fold_params(&sig.results),
        }
    }
}

#[cfg(test)]
mod tests {
    use oneof_syntax::{parse_type_expr, render_type};
    use rstest::rstest;

    use super::*;

    fn rewrite_src(src: &str) -> String {
        let ty = parse_type_expr(src).unwrap_or_else(|diags| panic!("{diags}"));
        render_type(&rewrite(&ty, "oneofNode", "Node")).unwrap()
    }

    #[rstest]
    #[case("*oneofNode", "Node")]
    #[case("**oneofNode", "*Node")]
    #[case("[]*oneofNode", "[]Node")]
    #[case("[3]*oneofNode", "[3]Node")]
    #[case("map[string]*oneofNode", "map[string]Node")]
    #[case("map[*oneofNode][]*oneofNode", "map[Node][]Node")]
    #[case("func(node *oneofNode) *oneofNode", "func(node Node) Node")]
    #[case("func(...*oneofNode) (*oneofNode, error)", "func(...Node) (Node, error)")]
    #[case("(*oneofNode)", "(Node)")]
    #[case("*oneofOther", "*oneofOther")]
    #[case("string", "string")]
    fn test_rewrite_shapes(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(rewrite_src(src), expected);
    }

    #[test]
    fn test_rewrite_nested_struct() {
        let rendered = rewrite_src(
            "struct {\nLeft *oneofNode\nRight *oneofNode\nMeta struct {\nParent *oneofNode\n}\n}",
        );
        assert_eq!(
            rendered,
            "struct {\n\tLeft  Node\n\tRight Node\n\tMeta  struct {\n\t\tParent Node\n\t}\n}"
        );
    }

    #[rstest]
    #[case("chan *oneofNode")]
    #[case("List[*oneofNode]")]
    #[case("interface{ Get() *oneofNode }")]
    fn test_unsupported_shapes_are_copied(#[case] src: &str) {
        let ty = parse_type_expr(src).unwrap();
        let rewritten = rewrite(&ty, "oneofNode", "Node");
        assert_eq!(rewritten, ty);
        assert_eq!(count_references(&rewritten, "oneofNode"), 1);
    }

    #[test]
    fn test_input_is_left_untouched() {
        let ty = parse_type_expr("map[string]*oneofNode").unwrap();
        let before = ty.clone();
        let _ = rewrite(&ty, "oneofNode", "Node");
        assert_eq!(ty, before);
    }
}
