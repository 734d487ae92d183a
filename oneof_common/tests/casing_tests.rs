#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use oneof_common::casing::{is_identifier, is_public, public_name};

#[test]
fn test_public_names_pass_through() {
    for name in ["Node", "Value", "OperatorSum", "HTTPServer", "UserID", "X"] {
        assert!(is_public(name), "{name} should already be canonical");
    }
}

#[test]
fn test_private_names_are_rejected() {
    for (name, expected) in [
        ("node", "Node"),
        ("operatorSum", "OperatorSum"),
        ("User_Id", "UserID"),
        ("xmlData", "XMLData"),
    ] {
        assert!(!is_public(name));
        assert_eq!(public_name(name), expected);
    }
}

// Property-based tests
#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen, quickcheck};

    #[derive(Clone, Debug)]
    struct GoIdent(String);

    impl Arbitrary for GoIdent {
        fn arbitrary(g: &mut Gen) -> Self {
            let letters: Vec<char> = ('a'..='z').chain('A'..='Z').collect();
            let tail: Vec<char> = letters
                .iter()
                .copied()
                .chain('0'..='9')
                .chain(['_'])
                .collect();

            let len = usize::arbitrary(g) % 12;
            let mut name = String::new();
            name.push(*g.choose(&letters).unwrap());
            for _ in 0..len {
                name.push(*g.choose(&tail).unwrap());
            }
            GoIdent(name)
        }
    }

    quickcheck! {
        fn prop_public_name_is_canonical(ident: GoIdent) -> bool {
            let public = public_name(&ident.0);
            is_identifier(&public) && is_public(&public)
        }

        fn prop_public_name_is_idempotent(ident: GoIdent) -> bool {
            let once = public_name(&ident.0);
            public_name(&once) == once
        }
    }
}
